use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
    pub engine: EngineStatus,
}

/// Deadline settings the path service is running with
#[derive(Serialize)]
pub struct EngineStatus {
    pub phase_timeout_ms: u64,
    pub unary_deadline: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.path_service.config();

    Json(HealthResponse {
        status: "healthy",
        version: navgraph::VERSION,
        timestamp: Utc::now().timestamp(),
        engine: EngineStatus {
            phase_timeout_ms: config.phase_timeout.as_millis() as u64,
            unary_deadline: config.bound_unary,
        },
    })
}
