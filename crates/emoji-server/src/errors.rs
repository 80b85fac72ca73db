//! HTTP error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emoji_embeddings::EmbeddingError;
use serde::Serialize;

use crate::metrics::ERRORS_TOTAL;

/// Errors returned by API handlers.
///
/// Rendered as `{"detail": "<message>"}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid client input (400).
    #[error("{0}")]
    BadRequest(String),

    /// Unknown resource (404).
    #[error("{0}")]
    NotFound(String),

    /// Server-side failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        metrics::counter!(ERRORS_TOTAL, "kind" => self.kind()).increment(1);
        let status = self.status();
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<EmbeddingError> for ApiError {
    fn from(err: EmbeddingError) -> Self {
        tracing::error!(error = %err, "query embedding failed");
        ApiError::Internal("Search failed".to_string())
    }
}
