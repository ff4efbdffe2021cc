//! Integration tests for the `/jobs` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use serde_json::json;

#[tokio::test]
async fn failed_agent_is_reported_with_error() {
    let app = common::build_test_app();
    let job_id = common::submit(&app, "broken", json!({})).await;

    let job = common::wait_for_job(&app, &job_id).await;
    assert_eq!(job["status"], "failed");
    assert!(job["result"].is_null());
    let error = job["error"].as_str().unwrap();
    assert!(error.contains("missing API key"), "error was: {error}");
    assert!(error.contains("code 2"), "error was: {error}");

    // The server keeps accepting work after a failure.
    let next = common::submit(&app, "echo", json!({ "overrides": { "msg": "still up" } })).await;
    let job = common::wait_for_job(&app, &next).await;
    assert_eq!(job["status"], "completed");
}

#[tokio::test]
async fn list_jobs_is_newest_first() {
    let app = common::build_test_app();
    let first = common::submit(&app, "echo", json!({ "overrides": { "n": 1 } })).await;
    let second = common::submit(&app, "echo", json!({ "overrides": { "n": 2 } })).await;
    let third = common::submit(&app, "echo", json!({ "overrides": { "n": 3 } })).await;

    let response = get(app.clone(), "/api/v1/jobs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [third.as_str(), second.as_str(), first.as_str()]);

    // A second listing with no new submissions keeps the same order.
    let again = body_json(get(app, "/api/v1/jobs").await).await;
    let again_ids: Vec<&str> = again["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, again_ids);
}

#[tokio::test]
async fn unknown_job_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/jobs/00000000-0000-4000-8000-000000000000").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Job with id 00000000-0000-4000-8000-000000000000 not found"
    );
}

#[tokio::test]
async fn malformed_job_id_is_rejected() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/jobs/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_counts_jobs() {
    let app = common::build_test_app();
    let job_id = common::submit(&app, "echo", json!({})).await;
    common::wait_for_job(&app, &job_id).await;

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["jobs_total"], 1);
    assert_eq!(json["jobs_running"], 0);
}
