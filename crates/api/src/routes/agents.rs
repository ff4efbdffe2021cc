//! Route definitions for the `/agents` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::agents;
use crate::state::AppState;

/// Routes mounted at `/agents`.
///
/// ```text
/// GET    /                -> list_agents
/// POST   /{name}/run      -> run_agent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agents::list_agents))
        .route("/{name}/run", post(agents::run_agent))
}
