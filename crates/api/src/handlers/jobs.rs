//! Handlers for the `/jobs` resource.

use agentdeck_core::types::JobId;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// List every job the process knows about, newest first.
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut jobs = state.registry.list().await;
    jobs.reverse();
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = state.registry.get(job_id).await?;
    Ok(Json(DataResponse { data: job }))
}
