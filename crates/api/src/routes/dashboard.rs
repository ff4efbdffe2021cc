use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Mount the HTML dashboard at `/` (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::index))
}
