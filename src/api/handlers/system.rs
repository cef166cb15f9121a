//! System endpoints: health check and the category catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::Category;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One loggable category.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CategoryInfo {
    category: Category,
    instant_field: &'static str,
    tracks_duration: bool,
}

/// `GET /config/categories`: List event categories.
#[utoipa::path(
    get,
    path = "/config/categories",
    tag = "System",
    summary = "List event categories",
    description = "Returns every category name accepted by the timeline and event endpoints, with the field that holds its instant.",
    responses(
        (status = 200, description = "Category catalog", body = Vec<CategoryInfo>),
    )
)]
pub async fn categories_handler() -> impl IntoResponse {
    let categories: Vec<CategoryInfo> = Category::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            category,
            instant_field: category.instant_field(),
            tracks_duration: matches!(category, Category::Nursing | Category::Sleep),
        })
        .collect();
    (StatusCode::OK, Json(categories))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/categories", get(categories_handler))
}
