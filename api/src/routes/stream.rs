//! Stream control endpoints.
//!
//! Starts and stops periodic generation and reports the simulator status.

use super::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use shared::simulator::SimulatorStatus;

type StatusResult = Result<Json<SimulatorStatus>, ApiError>;

/// Creates the stream control routes.
///
/// # Routes
///
/// - `GET /api/v1/logs/stream` - Current status
/// - `POST /api/v1/logs/stream/start` - Start generation (idempotent)
/// - `POST /api/v1/logs/stream/stop` - Stop generation, keeping the buffer
pub fn stream_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/logs/stream", get(stream_status))
        .route("/api/v1/logs/stream/start", post(start_stream))
        .route("/api/v1/logs/stream/stop", post(stop_stream))
        .with_state(state)
}

async fn stream_status(State(state): State<AppState>) -> StatusResult {
    Ok(Json(state.simulator().status()?))
}

async fn start_stream(State(state): State<AppState>) -> StatusResult {
    if !state.simulator().start() {
        tracing::debug!("Start requested while already streaming");
    }
    stream_status(State(state)).await
}

async fn stop_stream(State(state): State<AppState>) -> StatusResult {
    if !state.simulator().stop() {
        tracing::debug!("Stop requested while already stopped");
    }
    stream_status(State(state)).await
}
