//! # API Error Type
//!
//! Every failed request ends up here and leaves as the same JSON shape.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                         Status   Body                           │
//! │  ──────                         ──────   ────                           │
//! │  ValidationError (pharma-core)   400     { success: false, error }      │
//! │  DbError (pharma-db)             500     error = driver message         │
//! │  unmatched route / method        404     error = "Endpoint not found"   │
//! │  panic / task failure            500     error = "Something went wrong!"│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database messages reach the client verbatim. They can reveal table and
//! column names, so deployments exposed beyond a trusted network should
//! front the API with something that rewrites 500 bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use pharma_core::ValidationError;
use pharma_db::DbError;

/// Body text for unexpected failures.
pub const INTERNAL_MESSAGE: &str = "Something went wrong!";

pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";

/// API error type with automatic HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Driver or pool failure (500, message passed through)
    #[error(transparent)]
    Database(#[from] DbError),

    /// No route for this path and method (404)
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// Panic or lost task (500); the detail is only logged
    #[error("{}", INTERNAL_MESSAGE)]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(e) => warn!(error = %e, "Rejected request"),
            ApiError::NotFound => {}
            ApiError::Database(e) => error!(error = %e, "Database error"),
            ApiError::Internal(detail) => error!(detail = %detail, "Internal error"),
        }

        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_is_400() {
        let (status, body) = body_of(
            ValidationError::MissingFields {
                message: "Name is required",
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "error": "Name is required" }));
    }

    #[tokio::test]
    async fn test_database_error_passes_message_through() {
        let (status, body) = body_of(DbError::Query("Unknown column 'x'".into()).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unknown column 'x'");
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let (status, body) = body_of(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_exposed() {
        let (status, body) = body_of(ApiError::Internal("index out of bounds".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_MESSAGE);
    }
}
