//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{LogEntry, LogLevel};
use shared::simulator::ManualScheduler;

/// Creates a test router around a fresh, stopped simulator.
///
/// # Returns
///
/// The router, its state, and the scheduler that drives its ticks.
pub fn test_app() -> (Router, AppState, ManualScheduler) {
    let (state, scheduler) = AppState::with_manual_scheduler();
    let router = create_router(state.clone());
    (router, state, scheduler)
}

/// Generates `count` entries directly on the simulator.
pub fn tick_n(state: &AppState, count: usize) -> Vec<LogEntry> {
    (0..count)
        .map(|_| state.simulator().tick().unwrap())
        .collect()
}

/// Returns the level of a log in a JSON response.
pub fn level_of(log: &Value) -> LogLevel {
    serde_json::from_value(log["level"].clone()).unwrap()
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

/// Helper to make a GET request.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, "GET", uri).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Helper to make a GET request for a plain-text body.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let (status, headers, body) = send(app, "GET", uri).await;
    (status, headers, String::from_utf8(body).unwrap())
}

/// Helper to make a POST request without a body.
pub async fn post(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, "POST", uri).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Helper to make a DELETE request.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    send(app, "DELETE", uri).await.0
}
