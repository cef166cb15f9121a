//! Event write handlers: log, read, replace, delete, attach photos.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AttachPhotosRequest, AttachPhotosResponse, EventRequest, EventResponse, item_key,
};
use crate::app_state::AppState;
use crate::domain::{ChildId, TimelineEntry};
use crate::error::{ErrorResponse, GatewayError};

/// Header carrying the caller's user id, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller id from [`USER_ID_HEADER`], if the header is present.
pub(super) fn caller_id(headers: &HeaderMap) -> Result<Option<uuid::Uuid>, GatewayError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.parse().ok())
        .map(Some)
        .ok_or_else(|| GatewayError::InvalidRequest(format!("{USER_ID_HEADER} is not a UUID")))
}

/// `POST /children/{child_id}/events`: Log a new event.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on an inconsistent payload.
#[utoipa::path(
    post,
    path = "/api/v1/children/{child_id}/events",
    tag = "Events",
    summary = "Log an event",
    description = "Stores a new event of the category named in the body. Sleep sessions with a known end get their duration derived.",
    params(
        ("child_id" = uuid::Uuid, Path, description = "Child UUID"),
        ("x-user-id" = Option<uuid::Uuid>, Header, description = "Logging user"),
    ),
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event stored", body = EventResponse),
        (status = 400, description = "Invalid event", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Path(child_id): Path<uuid::Uuid>,
    headers: HeaderMap,
    Json(req): Json<EventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .event_service
        .log_event(
            ChildId::from_uuid(child_id),
            caller_id(&headers)?,
            req.payload,
            req.notes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(record))))
}

/// `GET /events/{category}/{id}`: Get one event with its photos.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{category}/{id}",
    tag = "Events",
    summary = "Get an event",
    params(
        ("category" = String, Path, description = "Category name"),
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event as a timeline entry", body = TimelineEntry),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, uuid::Uuid)>,
) -> Result<impl IntoResponse, GatewayError> {
    let entry = state
        .event_service
        .get_event(item_key(&category, id)?)
        .await?;
    Ok(Json(entry))
}

/// `PUT /events/{category}/{id}`: Replace an event's attributes.
///
/// # Errors
///
/// Returns [`GatewayError`] if the body's category differs from the path,
/// or the event does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/events/{category}/{id}",
    tag = "Events",
    summary = "Update an event",
    params(
        ("category" = String, Path, description = "Category name"),
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, uuid::Uuid)>,
    Json(req): Json<EventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .event_service
        .update_event(item_key(&category, id)?, req.payload, req.notes)
        .await?;
    Ok(Json(EventResponse::from(record)))
}

/// `DELETE /events/{category}/{id}`: Delete an event and its photos.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{category}/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Removes the event together with every photo attached to it.",
    params(
        ("category" = String, Path, description = "Category name"),
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, uuid::Uuid)>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .event_service
        .delete_event(item_key(&category, id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /events/{category}/{id}/photos`: Attach photos to an event.
///
/// # Errors
///
/// Returns [`GatewayError`] if no URLs are given or the event does not
/// exist.
#[utoipa::path(
    post,
    path = "/api/v1/events/{category}/{id}/photos",
    tag = "Events",
    summary = "Attach photos",
    params(
        ("category" = String, Path, description = "Category name"),
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = AttachPhotosRequest,
    responses(
        (status = 201, description = "Photos attached", body = AttachPhotosResponse),
        (status = 400, description = "No photo URLs", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn attach_photos(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, uuid::Uuid)>,
    Json(req): Json<AttachPhotosRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let photos = state
        .event_service
        .attach_photos(item_key(&category, id)?, req.photo_urls)
        .await?;
    Ok((StatusCode::CREATED, Json(AttachPhotosResponse { photos })))
}

/// Event write routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/children/{child_id}/events", post(create_event))
        .route(
            "/events/{category}/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{category}/{id}/photos", post(attach_photos))
}
