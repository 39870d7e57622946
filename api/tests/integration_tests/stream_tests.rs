//! Integration tests for stream control.
//!
//! Tests cover:
//! - Start/stop over HTTP with a manual scheduler
//! - Real timer behavior on a paused Tokio clock

use api::{create_router, AppState};
use axum::http::StatusCode;
use shared::config::SimulatorConfig;
use shared::simulator::TokioScheduler;
use std::sync::Arc;
use std::time::Duration;

use super::common::{get, post, test_app};

#[tokio::test]
async fn test_start_stop_over_http() {
    let (app, _state, scheduler) = test_app();

    let (status, response) = post(app.clone(), "/api/v1/logs/stream/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["running"], true);

    scheduler.advance(Duration::from_millis(3000 * 5));
    let (_, response) = get(app.clone(), "/api/v1/logs").await;
    assert_eq!(response["total_count"], 5);

    let (_, response) = post(app.clone(), "/api/v1/logs/stream/stop").await;
    assert_eq!(response["running"], false);
    assert_eq!(response["len"], 5);

    scheduler.advance(Duration::from_secs(600));
    let (_, response) = get(app.clone(), "/api/v1/logs/stream").await;
    assert_eq!(response["len"], 5);

    post(app.clone(), "/api/v1/logs/stream/start").await;
    scheduler.advance(Duration::from_millis(3000));
    let (_, response) = get(app, "/api/v1/logs/stream").await;
    assert_eq!(response["len"], 6);
}

#[tokio::test]
async fn test_double_start_registers_one_timer() {
    let (app, _state, scheduler) = test_app();

    post(app.clone(), "/api/v1/logs/stream/start").await;
    post(app.clone(), "/api/v1/logs/stream/start").await;
    assert_eq!(scheduler.active(), 1);

    scheduler.advance(Duration::from_millis(3000));
    let (_, response) = get(app, "/api/v1/logs").await;
    assert_eq!(response["total_count"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_stream_with_preloaded_samples() {
    let config = SimulatorConfig {
        seed: Some(11),
        ..SimulatorConfig::default()
    };
    let state = AppState::from_config(&config, Arc::new(TokioScheduler::current())).unwrap();
    let app = create_router(state.clone());

    let (_, response) = get(app.clone(), "/api/v1/logs").await;
    assert_eq!(response["total_count"], 8);
    assert_eq!(response["logs"][0]["traceId"], "trace-001");

    post(app.clone(), "/api/v1/logs/stream/start").await;
    tokio::time::sleep(Duration::from_millis(3000 * 4 + 1)).await;

    let (_, response) = post(app.clone(), "/api/v1/logs/stream/stop").await;
    assert_eq!(response["len"], 12);

    tokio::time::sleep(Duration::from_secs(3600)).await;
    let (_, response) = get(app, "/api/v1/logs/stream").await;
    assert_eq!(response["len"], 12);
    assert_eq!(response["running"], false);
}
