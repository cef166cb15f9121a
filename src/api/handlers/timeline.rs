//! Timeline and statistics read handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    StatisticsParams, TimelineParams, TimelineResponse, parse_optional_instant,
};
use crate::app_state::AppState;
use crate::domain::{Category, ChildId, PageRequest};
use crate::error::{ErrorResponse, GatewayError};
use crate::service::{DailyStat, TimelineQuery};

/// `GET /children/{child_id}/timeline`: Unified activity feed.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid category or window, or a store
/// failure.
#[utoipa::path(
    get,
    path = "/api/v1/children/{child_id}/timeline",
    tag = "Timeline",
    summary = "Get a child's timeline",
    description = "Returns one page of the child's events across all categories (or one), newest first, each with its attached photos.",
    params(
        ("child_id" = uuid::Uuid, Path, description = "Child UUID"),
        TimelineParams,
    ),
    responses(
        (status = 200, description = "Timeline page", body = TimelineResponse),
        (status = 400, description = "Invalid category, window or date", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(child_id): Path<uuid::Uuid>,
    Query(params): Query<TimelineParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let start = parse_optional_instant("startDate", params.start_date.as_deref())?;
    let end = parse_optional_instant("endDate", params.end_date.as_deref())?;
    let page = PageRequest::new(
        params.page.unwrap_or(1),
        state.settings.resolve_limit(params.limit),
    );

    let query = TimelineQuery::parse(
        ChildId::from_uuid(child_id),
        params.category.as_deref(),
        start,
        end,
        page,
    )?;
    let result = state.timeline_service.timeline(query).await?;

    Ok(Json(TimelineResponse::from(result)))
}

/// `GET /children/{child_id}/statistics`: Per-day counts for a category.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid category or window, or a store
/// failure.
#[utoipa::path(
    get,
    path = "/api/v1/children/{child_id}/statistics",
    tag = "Timeline",
    summary = "Get daily statistics",
    description = "Groups a category's events by UTC day and returns the count and total duration in minutes per day. Defaults to the last few days.",
    params(
        ("child_id" = uuid::Uuid, Path, description = "Child UUID"),
        StatisticsParams,
    ),
    responses(
        (status = 200, description = "Daily statistics, oldest day first", body = Vec<DailyStat>),
        (status = 400, description = "Invalid category, window or date", body = ErrorResponse),
    )
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(child_id): Path<uuid::Uuid>,
    Query(params): Query<StatisticsParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let category: Category = params.category.parse()?;
    let start = parse_optional_instant("startDate", params.start_date.as_deref())?;
    let end = parse_optional_instant("endDate", params.end_date.as_deref())?;

    let service = &state.statistics_service;
    let window = service.window(start, end, Utc::now())?;
    let stats = service
        .daily(ChildId::from_uuid(child_id), category, window)
        .await?;

    Ok(Json(stats))
}

/// Per-child read routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/children/{child_id}/timeline", get(get_timeline))
        .route("/children/{child_id}/statistics", get(get_statistics))
}
