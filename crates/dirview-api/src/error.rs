//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use dirview_auth::AuthError;
use dirview_core::error::{AppError, ErrorKind};
use dirview_storage::PathError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<PathError> for ApiError {
    fn from(err: PathError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code, message) = match err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.message),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.message),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.message),
            ErrorKind::RateLimited => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", err.message)
            }
            _ => {
                match &err.source {
                    Some(source) => tracing::error!(
                        kind = %err.kind,
                        error = %err.message,
                        source = %source,
                        "Internal server error"
                    ),
                    None => tracing::error!(
                        kind = %err.kind,
                        error = %err.message,
                        "Internal server error"
                    ),
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
