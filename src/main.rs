//! babylog-gateway server entry point.
//!
//! Picks a store from the configuration and serves the REST API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use babylog_gateway::api;
use babylog_gateway::app_state::AppState;
use babylog_gateway::config::GatewayConfig;
use babylog_gateway::persistence::{
    ChildStore, EventStore, MemoryStore, PhotoStore, PostgresStore,
};

type Stores = (Arc<dyn ChildStore>, Arc<dyn EventStore>, Arc<dyn PhotoStore>);

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn open_stores(config: &GatewayConfig) -> anyhow::Result<Stores> {
    if config.persistence_enabled {
        let store = Arc::new(
            PostgresStore::connect(config)
                .await
                .context("connecting to PostgreSQL")?,
        );
        store.migrate().await.context("running migrations")?;
        tracing::info!("using PostgreSQL store");
        Ok((
            Arc::clone(&store) as Arc<dyn ChildStore>,
            Arc::clone(&store) as Arc<dyn EventStore>,
            store as Arc<dyn PhotoStore>,
        ))
    } else {
        let store = Arc::new(MemoryStore::new());
        tracing::info!("using in-memory store");
        Ok((
            Arc::clone(&store) as Arc<dyn ChildStore>,
            Arc::clone(&store) as Arc<dyn EventStore>,
            store as Arc<dyn PhotoStore>,
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    init_tracing(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting babylog-gateway");

    let (children, events, photos) = open_stores(&config).await?;
    let app_state = AppState::new(children, events, photos, config.api_settings());

    let app = Router::new()
        .merge(api::build_router())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
