//! Integration tests for the log view and export routes.
//!
//! Tests cover:
//! - Filtering by level, service, and text
//! - Newest-first ordering and capacity bounds
//! - Clearing the buffer
//! - Plain-text export

use api::{create_router, AppState};
use axum::http::{header, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use shared::models::{LogEntry, LogLevel};
use shared::simulator::{LogGenerator, LogStreamSimulator, ManualScheduler};
use shared::storage::{BoundedLogStore, LogStore};
use std::sync::Arc;

use super::common::{delete, get, get_text, level_of, test_app, tick_n};

/// Router over a store the test can write to directly.
fn app_with_entries(entries: Vec<LogEntry>) -> Router {
    let store = BoundedLogStore::new_shared(100);
    for entry in entries {
        store.insert(entry).unwrap();
    }
    let simulator = LogStreamSimulator::new(
        store,
        LogGenerator::seeded(1),
        Arc::new(ManualScheduler::new()),
        std::time::Duration::from_secs(3),
    );
    create_router(AppState::new(Arc::new(simulator)))
}

fn entry(id: &str, level: LogLevel, service: &str, message: &str, ms: i64) -> LogEntry {
    let base = Utc.with_ymd_and_hms(2024, 1, 15, 14, 32, 10).unwrap();
    LogEntry::new(id, level, service, message)
        .with_timestamp(base + Duration::milliseconds(ms))
        .with_trace_id(format!("trace-{id}"))
}

#[tokio::test]
async fn test_generated_logs_listed_newest_first() {
    let (app, state, _scheduler) = test_app();
    let generated = tick_n(&state, 6);

    let (status, response) = get(app, "/api/v1/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 6);

    let ids: Vec<&str> = response["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = generated.iter().rev().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_buffer_capped_at_capacity() {
    let (app, state, _scheduler) = test_app();
    let generated = tick_n(&state, 130);

    let (_, response) = get(app, "/api/v1/logs").await;
    let logs = response["logs"].as_array().unwrap();

    assert_eq!(logs.len(), 100);
    assert_eq!(logs[0]["id"], generated[129].id.as_str());
    assert_eq!(logs[99]["id"], generated[30].id.as_str());
}

#[tokio::test]
async fn test_filter_by_level_across_all_levels() {
    let (app, state, _scheduler) = test_app();
    tick_n(&state, 80);

    let mut seen = 0;
    for level in LogLevel::ALL {
        let uri = format!("/api/v1/logs?level={level}");
        let (status, response) = get(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);

        let logs = response["logs"].as_array().unwrap();
        assert!(logs.iter().all(|l| level_of(l) == level));
        seen += logs.len();
    }
    assert_eq!(seen, 80);

    let (_, response) = get(app, "/api/v1/logs?level=ALL").await;
    assert_eq!(response["total_count"], 80);
}

#[tokio::test]
async fn test_filter_by_service_keeps_relative_order() {
    let app = app_with_entries(vec![
        entry("1", LogLevel::Info, "auth-api", "Token refresh successful", 0),
        entry("2", LogLevel::Warn, "data-api", "Slow query", 100),
        entry("3", LogLevel::Error, "auth-api", "Invalid token signature", 200),
    ]);

    let (status, response) = get(app, "/api/v1/logs?level=all&service=auth-api&q=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 2);

    let logs = response["logs"].as_array().unwrap();
    assert_eq!(logs[0]["id"], "3");
    assert_eq!(logs[1]["id"], "1");
}

#[tokio::test]
async fn test_text_query_is_case_insensitive_over_message_and_service() {
    let app = app_with_entries(vec![
        entry("1", LogLevel::Warn, "cache", "Cache miss for key: user_profile", 0),
        entry("2", LogLevel::Info, "web-app", "HTTP GET /api/users/profile completed", 100),
        entry("3", LogLevel::Info, "data-api", "Database connection pool: 47/100", 200),
    ]);

    let uri = format!("/api/v1/logs?q={}", urlencoding::encode("PROFILE"));
    let (_, response) = get(app.clone(), &uri).await;
    assert_eq!(response["total_count"], 2);

    let (_, response) = get(app.clone(), "/api/v1/logs?q=CACHE").await;
    assert_eq!(response["total_count"], 1);
    assert_eq!(response["logs"][0]["id"], "1");

    let uri = format!(
        "/api/v1/logs?level=info&q={}",
        urlencoding::encode("connection pool")
    );
    let (_, response) = get(app, &uri).await;
    assert_eq!(response["total_count"], 1);
    assert_eq!(response["logs"][0]["service"], "data-api");
}

#[tokio::test]
async fn test_unknown_filter_values_match_nothing() {
    let (app, state, _scheduler) = test_app();
    tick_n(&state, 20);

    let (status, response) = get(app.clone(), "/api/v1/logs?level=fatal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);

    let (status, response) = get(app, "/api/v1/logs?service=billing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
}

#[tokio::test]
async fn test_clear_then_query_is_empty() {
    let (app, state, _scheduler) = test_app();
    tick_n(&state, 15);

    assert_eq!(delete(app.clone(), "/api/v1/logs").await, StatusCode::NO_CONTENT);

    for uri in [
        "/api/v1/logs",
        "/api/v1/logs?level=error",
        "/api/v1/logs?service=auth-api&q=token",
    ] {
        let (_, response) = get(app.clone(), uri).await;
        assert_eq!(response["total_count"], 0);
    }
}

#[tokio::test]
async fn test_export_two_line_view() {
    let app = app_with_entries(vec![
        entry("1", LogLevel::Error, "auth-api", "Failed to authenticate user", 0),
        entry("2", LogLevel::Info, "web-app", "Session started", 345),
        entry("3", LogLevel::Error, "data-api", "Pool exhausted", 789),
    ]);

    let (status, headers, body) = get_text(app, "/api/v1/logs/export?level=error").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(
        body,
        "[14:32:10.789] [ERROR] [data-api] Pool exhausted trace-3\n\
         [14:32:10.000] [ERROR] [auth-api] Failed to authenticate user trace-1"
    );
}

#[tokio::test]
async fn test_export_entry_without_trace_id() {
    let base = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
    let app = app_with_entries(vec![
        LogEntry::new("1", LogLevel::Debug, "cache", "warmup").with_timestamp(base),
    ]);

    let (_, _, body) = get_text(app, "/api/v1/logs/export").await;
    assert_eq!(body, "[08:00:00.000] [DEBUG] [cache] warmup ");
}

#[tokio::test]
async fn test_export_empty_view() {
    let (app, _state, _scheduler) = test_app();

    let (status, _, body) = get_text(app, "/api/v1/logs/export").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
