//! Log view endpoints.
//!
//! Serves the filtered buffer as JSON, clears it, and offers the filtered
//! view as a plain-text download.

use super::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::export;
use shared::models::{LogEntry, LogFilter};
use shared::storage::LogQuery;

/// Query parameters shared by the list and export routes.
///
/// `level` and `service` accept `all`; an unknown level yields no results.
#[derive(Debug, Default, Deserialize)]
pub struct LogQueryParams {
    /// Level name or `all`.
    pub level: Option<String>,
    /// Service name or `all`.
    pub service: Option<String>,
    /// Case-insensitive text matched against message or service.
    pub q: Option<String>,
    /// Maximum number of entries to return (list route only).
    pub limit: Option<usize>,
    /// Number of entries to skip (list route only).
    pub offset: Option<usize>,
}

impl LogQueryParams {
    fn filter(&self) -> LogFilter {
        LogFilter::from_raw(
            self.level.as_deref(),
            self.service.as_deref(),
            self.q.as_deref(),
        )
    }
}

/// Response for log queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogQueryResponse {
    /// Matching logs, newest first.
    pub logs: Vec<LogEntry>,
    /// Total count of matching logs (before limit/offset applied).
    pub total_count: usize,
    /// Number of logs returned in this response.
    pub returned_count: usize,
}

/// Creates the log view routes.
///
/// # Routes
///
/// - `GET /api/v1/logs` - Filtered view, newest first
/// - `DELETE /api/v1/logs` - Clear the buffer
/// - `GET /api/v1/logs/export` - Filtered view as a text download
pub fn logs_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/logs", get(query_logs).delete(clear_logs))
        .route("/api/v1/logs/export", get(export_logs))
        .with_state(state)
}

async fn query_logs(
    State(state): State<AppState>,
    Query(params): Query<LogQueryParams>,
) -> Result<Json<LogQueryResponse>, ApiError> {
    let mut query = LogQuery::new().with_filter(params.filter());
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }
    if let Some(offset) = params.offset {
        query = query.with_offset(offset);
    }

    let result = state.simulator().query_page(&query)?;

    tracing::debug!(
        filter = ?query.filter,
        total_count = result.total_count,
        "Served log view"
    );

    Ok(Json(LogQueryResponse {
        returned_count: result.logs.len(),
        total_count: result.total_count,
        logs: result.logs,
    }))
}

async fn clear_logs(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.simulator().clear()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_logs(
    State(state): State<AppState>,
    Query(params): Query<LogQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state.simulator().export(&params.filter())?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::suggested_filename(chrono::Utc::now())
    );

    Ok((
        [
            (header::CONTENT_TYPE, export::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use shared::models::LogLevel;
    use tower::ServiceExt;

    fn seeded_router(ticks: usize) -> (Router, AppState) {
        let (state, _scheduler) = AppState::with_manual_scheduler();
        for _ in 0..ticks {
            state.simulator().tick().unwrap();
        }
        (logs_routes(state.clone()), state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, LogQueryResponse) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_query_all_logs() {
        let (app, _state) = seeded_router(5);

        let (status, result) = get_json(app, "/api/v1/logs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(result.total_count, 5);
        assert_eq!(result.returned_count, 5);
    }

    #[tokio::test]
    async fn test_query_by_level() {
        let (app, state) = seeded_router(40);
        let expected = state
            .simulator()
            .query(&LogFilter::new().with_level(LogLevel::Warn))
            .unwrap()
            .len();

        let (status, result) = get_json(app, "/api/v1/logs?level=warn").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(result.total_count, expected);
        assert!(result.logs.iter().all(|l| l.level == LogLevel::Warn));
    }

    #[tokio::test]
    async fn test_unknown_level_returns_empty_view() {
        let (app, _state) = seeded_router(10);

        let (status, result) = get_json(app, "/api/v1/logs?level=critical").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(result.total_count, 0);
        assert!(result.logs.is_empty());
    }

    #[tokio::test]
    async fn test_query_pagination() {
        let (app, _state) = seeded_router(10);

        let (_, result) = get_json(app, "/api/v1/logs?limit=3&offset=2").await;

        assert_eq!(result.total_count, 10);
        assert_eq!(result.returned_count, 3);
    }

    #[tokio::test]
    async fn test_clear_logs() {
        let (app, state) = seeded_router(4);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/logs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.simulator().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_export_sets_download_headers() {
        let (app, state) = seeded_router(3);
        let expected = state.simulator().export(&LogFilter::new()).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/logs/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"logs-"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), expected);
    }
}
