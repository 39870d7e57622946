//! Integration tests for health check and empty-buffer behavior.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state, _scheduler) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "logpulse-api");
    assert_eq!(response["streaming"], false);
}

#[tokio::test]
async fn test_empty_buffer_returns_empty_results() {
    let (app, _state, _scheduler) = test_app();

    let (status, response) = get(app.clone(), "/api/v1/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
    assert!(response["logs"].as_array().unwrap().is_empty());

    let (status, response) = get(app, "/api/v1/logs?level=error&service=auth-api&q=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
}
