pub mod agents;
pub mod dashboard;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /agents                      list catalog
/// /agents/{name}/run           submit a job (POST)
///
/// /jobs                        list jobs, newest first
/// /jobs/{id}                   get a single job
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Agent catalog and job submission.
        .nest("/agents", agents::router())
        // Job status polling.
        .nest("/jobs", jobs::router())
}
