//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` and
//! `/config/categories` sit at the root. With the `swagger-ui` feature the
//! OpenAPI document is served at `/api-docs/openapi.json` and browsable at
//! `/swagger-ui`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "babylog-gateway", description = "Family baby-activity log and unified timeline"),
    paths(
        handlers::system::health_handler,
        handlers::system::categories_handler,
        handlers::children::list_children,
        handlers::children::create_child,
        handlers::children::get_child,
        handlers::children::update_child,
        handlers::children::delete_child,
        handlers::timeline::get_timeline,
        handlers::timeline::get_statistics,
        handlers::events::create_event,
        handlers::events::get_event,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::events::attach_photos,
    ),
    tags(
        (name = "System", description = "Health and catalog"),
        (name = "Children", description = "Children the events belong to"),
        (name = "Timeline", description = "Unified feed and statistics"),
        (name = "Events", description = "Logging and editing events"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
