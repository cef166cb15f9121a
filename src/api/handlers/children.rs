//! Child handlers: list, create, read, replace, delete.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use super::events::caller_id;
use crate::api::dto::{ChildRequest, ChildResponse};
use crate::app_state::AppState;
use crate::domain::ChildId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /children`: List children.
///
/// # Errors
///
/// Returns [`GatewayError`] on a malformed user header or a store failure.
#[utoipa::path(
    get,
    path = "/api/v1/children",
    tag = "Children",
    summary = "List children",
    description = "Returns the children created by the calling user, or every child when no user header is sent.",
    params(
        ("x-user-id" = Option<uuid::Uuid>, Header, description = "Owning user"),
    ),
    responses(
        (status = 200, description = "Children, oldest record first", body = Vec<ChildResponse>),
        (status = 400, description = "Malformed user header", body = ErrorResponse),
    )
)]
pub async fn list_children(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, GatewayError> {
    let children = state.child_service.list(caller_id(&headers)?).await?;
    let now = Utc::now();
    let body: Vec<ChildResponse> = children
        .into_iter()
        .map(|child| ChildResponse::at(child, now))
        .collect();
    Ok(Json(body))
}

/// `POST /children`: Register a child.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on a blank field or bad date.
#[utoipa::path(
    post,
    path = "/api/v1/children",
    tag = "Children",
    summary = "Create a child",
    description = "Stores a child owned by the calling user. A birth date in the future is accepted.",
    params(
        ("x-user-id" = Option<uuid::Uuid>, Header, description = "Owning user"),
    ),
    request_body = ChildRequest,
    responses(
        (status = 201, description = "Child stored", body = ChildResponse),
        (status = 400, description = "Invalid child", body = ErrorResponse),
    )
)]
pub async fn create_child(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChildRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let owner = caller_id(&headers)?;
    let child = state
        .child_service
        .create(owner, req.into_profile()?)
        .await?;
    Ok((StatusCode::CREATED, Json(ChildResponse::at(child, Utc::now()))))
}

/// `GET /children/{child_id}`: Get one child.
///
/// # Errors
///
/// Returns [`GatewayError::ChildNotFound`] if the child does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/children/{child_id}",
    tag = "Children",
    summary = "Get a child",
    params(("child_id" = uuid::Uuid, Path, description = "Child UUID")),
    responses(
        (status = 200, description = "Child", body = ChildResponse),
        (status = 404, description = "Child not found", body = ErrorResponse),
    )
)]
pub async fn get_child(
    State(state): State<AppState>,
    Path(child_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let child = state
        .child_service
        .get(ChildId::from_uuid(child_id))
        .await?;
    Ok(Json(ChildResponse::at(child, Utc::now())))
}

/// `PUT /children/{child_id}`: Replace a child's details.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid body or if the child does not
/// exist.
#[utoipa::path(
    put,
    path = "/api/v1/children/{child_id}",
    tag = "Children",
    summary = "Update a child",
    params(("child_id" = uuid::Uuid, Path, description = "Child UUID")),
    request_body = ChildRequest,
    responses(
        (status = 200, description = "Child updated", body = ChildResponse),
        (status = 400, description = "Invalid child", body = ErrorResponse),
        (status = 404, description = "Child not found", body = ErrorResponse),
    )
)]
pub async fn update_child(
    State(state): State<AppState>,
    Path(child_id): Path<uuid::Uuid>,
    Json(req): Json<ChildRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let child = state
        .child_service
        .update(ChildId::from_uuid(child_id), req.into_profile()?)
        .await?;
    Ok(Json(ChildResponse::at(child, Utc::now())))
}

/// `DELETE /children/{child_id}`: Delete a child with all its events.
///
/// # Errors
///
/// Returns [`GatewayError::ChildNotFound`] if the child does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/children/{child_id}",
    tag = "Children",
    summary = "Delete a child",
    description = "Removes the child, every event logged for it and those events' photos.",
    params(("child_id" = uuid::Uuid, Path, description = "Child UUID")),
    responses(
        (status = 204, description = "Child deleted"),
        (status = 404, description = "Child not found", body = ErrorResponse),
    )
)]
pub async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .child_service
        .delete(ChildId::from_uuid(child_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Child routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/children", get(list_children).post(create_child))
        .route(
            "/children/{child_id}",
            get(get_child).put(update_child).delete(delete_child),
        )
}
