//! Error responses.
//!
//! Every failure leaves the API as `{"error": "<message>"}` with a status
//! chosen here:
//! - bad caller input → 400
//! - tool could not run or timed out → 502
//! - run cancelled by shutdown → 503

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::diagnostics::{CommandError, DiagnosticsError};
use crate::load::LoadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("service is shutting down")]
    ShuttingDown,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Command(_) => StatusCode::BAD_GATEWAY,
            ApiError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<LoadError> for ApiError {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            LoadError::Cancelled => ApiError::ShuttingDown,
        }
    }
}

impl From<DiagnosticsError> for ApiError {
    fn from(error: DiagnosticsError) -> Self {
        match error {
            DiagnosticsError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            DiagnosticsError::Command(e) => ApiError::Command(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(LoadError::InvalidInput("url is required".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(LoadError::Cancelled).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::from(DiagnosticsError::Command(CommandError::Spawn {
                program: "nmap".into(),
                reason: "not found".into(),
            }))
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_message_is_preserved() {
        let err = ApiError::from(LoadError::InvalidInput("requests must be >= 1".into()));
        assert_eq!(err.to_string(), "requests must be >= 1");
    }
}
