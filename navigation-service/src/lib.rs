pub mod config;
pub mod error;
pub mod handlers;

pub use config::Config;
pub use error::{ApiError, ApiResult};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use handlers::{health, paths};
use navgraph::{EngineConfig, PathService};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub path_service: Arc<PathService>,
}

impl AppState {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            path_service: Arc::new(PathService::new(engine)),
        }
    }
}

/// Build the HTTP router
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    // Raw streamed bodies bypass the extractor limit
    let stream_route = Router::new()
        .route("/api/v1/paths/stream", post(paths::get_optimal_path_stream))
        .layer(RequestBodyLimitLayer::new(max_body_bytes));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Path endpoints
        .route("/api/v1/paths", post(paths::get_optimal_path))
        .merge(stream_route)
        .with_state(state)
        // Middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
}
