#![allow(dead_code)]

use std::time::Duration;

use agentdeck_core::catalog::AgentCatalog;
use agentdeck_core::registry::JobRegistry;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use agentdeck_api::config::ServerConfig;
use agentdeck_api::engine::JobDispatcher;
use agentdeck_api::router::build_app_router;
use agentdeck_api::state::AppState;

/// Catalog used by the API tests.
///
/// - `echo`: built-in, accepts overrides.
/// - `trading`: external command, rejects overrides.
/// - `broken`: external command that always exits non-zero.
pub const TEST_CATALOG: &str = r#"[
    { "name": "echo", "description": "Echo overrides back.",
      "supports_overrides": true, "reusable": true, "kind": "echo" },
    { "name": "trading", "description": "LLM-driven trading pipeline.",
      "kind": "command", "program": "bash",
      "args": ["-c", "echo '{\"message\": \"Trading cycle complete\"}'"] },
    { "name": "broken", "description": "Always fails.",
      "kind": "command", "program": "bash",
      "args": ["-c", "echo 'missing API key' >&2; exit 2"] }
]"#;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        worker_pool_size: 2,
        agents_file: None,
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app() -> Router {
    let config = test_config();
    let catalog = AgentCatalog::from_json(TEST_CATALOG).unwrap();
    let dispatcher = JobDispatcher::new(
        catalog,
        Arc::new(JobRegistry::new()),
        config.worker_pool_size,
    );
    build_app_router(AppState::new(config, dispatcher))
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Submit a run and return the job id from the 202 response.
pub async fn submit(app: &Router, agent: &str, body: serde_json::Value) -> String {
    let response = post_json(app.clone(), &format!("/api/v1/agents/{agent}/run"), body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    json["data"]["job_id"].as_str().unwrap().to_string()
}

/// Poll `GET /api/v1/jobs/{id}` until the job leaves `running`.
pub async fn wait_for_job(app: &Router, job_id: &str) -> serde_json::Value {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let response = get(app.clone(), &format!("/api/v1/jobs/{job_id}")).await;
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            if json["data"]["status"] != "running" {
                return json["data"].clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}
