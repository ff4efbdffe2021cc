//! Handlers for the `/agents` resource.

use agentdeck_core::job::JobStatus;
use agentdeck_core::overrides::{self, Overrides};
use agentdeck_core::types::JobId;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /agents/{name}/run`.
#[derive(Debug, Default, Deserialize)]
pub struct RunAgentRequest {
    #[serde(default)]
    pub overrides: Overrides,
}

/// Acknowledgement returned when a job has been queued.
#[derive(Debug, Serialize)]
pub struct RunAgentResponse {
    pub job_id: JobId,
    pub status: JobStatus,
}

/// GET /api/v1/agents
///
/// List the agent catalog in declaration order.
pub async fn list_agents(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let agents = state.dispatcher.list_agents().await;
    Ok(Json(DataResponse { data: agents }))
}

/// POST /api/v1/agents/{name}/run
///
/// Submit a run of the named agent. Overrides are cleaned (strings trimmed,
/// empty values dropped) before validation. Returns 202 with the job id;
/// poll `/jobs/{id}` for the outcome. A body that is not a valid
/// `RunAgentRequest` is a 400 in the usual error envelope.
pub async fn run_agent(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<RunAgentRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let overrides = overrides::normalize(input.overrides);
    let job_id = state.dispatcher.run(&name, overrides).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: RunAgentResponse {
                job_id,
                status: JobStatus::Running,
            },
        }),
    ))
}
