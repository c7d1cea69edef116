use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{GeoSeekError, GeoSeekResult};
use crate::pipeline::SearchPipeline;

pub mod search;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SearchPipeline>,
}

/// Build the application router over a ready pipeline.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search-opensearch", get(search::search_opensearch))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: AppConfig) -> GeoSeekResult<()> {
    let pipeline = SearchPipeline::from_config(&config)?;
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|err| GeoSeekError::Internal(format!("invalid server address: {err}")))?;

    tracing::info!(%addr, "starting search gateway");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| GeoSeekError::Internal(format!("failed to bind server: {err}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|err| GeoSeekError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}
