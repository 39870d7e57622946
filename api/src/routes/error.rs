//! Error type shared by the log routes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::storage::LogStoreError;
use thiserror::Error;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

/// Failures surfaced by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The log buffer could not be read or written.
    #[error(transparent)]
    Storage(#[from] LogStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };
        tracing::error!(error = %self, "Log buffer operation failed");

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_storage_error_maps_to_500() {
        let response = ApiError::from(LogStoreError::LockError).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "storage_error");
        assert_eq!(error.message, "Failed to acquire lock on log store");
    }
}
