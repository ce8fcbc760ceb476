//! API error type and the JSON error envelope.
//!
//! Every failed response carries the same flat body:
//! `{"status": "error", "code": ..., "message": ...}` with codes
//! `INVALID_PARAMS` (validation), `HTTP_ERROR` (other 4xx), and
//! `INTERNAL_ERROR` (500).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use paperwatch_core::Error as CoreError;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request validation failed (400)
    #[error("{0}")]
    InvalidParams(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidParams(msg) => (StatusCode::BAD_REQUEST, "INVALID_PARAMS", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "HTTP_ERROR", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "status": "error",
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::PaperNotFound(_) | CoreError::JobNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            CoreError::InvalidInput(msg) => ApiError::InvalidParams(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
