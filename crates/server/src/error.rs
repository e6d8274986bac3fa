//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use liftsheet_tables::TableError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Underlying cause, attached for backing store failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unavailable(_) => "unavailable",
            Self::Table(e) => match e {
                TableError::Validation(_) => "validation_error",
                TableError::NotFound(_) => "not_found",
                TableError::Duplicate(_) => "duplicate",
                TableError::SchemaMismatch { .. } => "schema_mismatch",
                TableError::Store(_) => "store_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Table(e) => match e {
                TableError::Validation(_)
                | TableError::Duplicate(_)
                | TableError::SchemaMismatch { .. } => StatusCode::BAD_REQUEST,
                TableError::NotFound(_) => StatusCode::NOT_FOUND,
                TableError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::Table(TableError::Store(e)) => ErrorResponse {
                error: "backing store request failed".to_string(),
                details: Some(e.to_string()),
            },
            Self::Table(
                TableError::Validation(msg) | TableError::NotFound(msg) | TableError::Duplicate(msg),
            ) => ErrorResponse {
                error: msg.clone(),
                details: None,
            },
            other => ErrorResponse {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        crate::metrics::record_api_error(self.code());
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
