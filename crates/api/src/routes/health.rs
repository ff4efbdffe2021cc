use agentdeck_core::job::JobStatus;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Jobs tracked since the process started.
    pub jobs_total: usize,
    /// Jobs not yet in a terminal state.
    pub jobs_running: usize,
    /// Worker pool capacity.
    pub worker_pool_size: usize,
}

/// GET /health -- returns service status and job counters.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        jobs_total: state.registry.len().await,
        jobs_running: state.registry.count_by_status(JobStatus::Running).await,
        worker_pool_size: state.dispatcher.capacity(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
