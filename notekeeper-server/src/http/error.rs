//! API error types with IntoResponse
//!
//! Errors are converted to JSON envelopes with appropriate status codes:
//! `{ "success": false, "error": <kind>, "message": <text>, "field"?: <path> }`.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::StoreError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body is not usable JSON (400, or 415 without a JSON content type)
    InvalidBody { status: StatusCode, message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Request exceeded the configured time limit (408)
    Timeout { after: Duration },

    /// Backing store unreachable (503, logged)
    StoreUnavailable(StoreError),

    /// Any other store failure (500, logged)
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => json!({
                "success": false,
                "error": "validation_error",
                "message": e.to_string(),
                "field": e.field()
            }),
            Self::InvalidBody { message, .. } => json!({
                "success": false,
                "error": "invalid_body",
                "message": message
            }),
            Self::NotFound { resource, id } => json!({
                "success": false,
                "error": "not_found",
                "message": format!("{} '{}' not found", resource, id)
            }),
            Self::Timeout { after } => {
                tracing::warn!("Request timed out after {:?}", after);
                json!({
                    "success": false,
                    "error": "timeout",
                    "message": format!("request did not complete within {:?}", after)
                })
            }
            Self::StoreUnavailable(e) => {
                tracing::warn!("Store unavailable: {}", e);
                json!({
                    "success": false,
                    "error": "store_unavailable",
                    "message": "note store is temporarily unavailable"
                })
            }
            Self::Store(e) => {
                // Log the actual error, return generic message
                tracing::error!("Store error: {}", e);
                json!({
                    "success": false,
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        if e.is_unavailable() {
            Self::StoreUnavailable(e)
        } else {
            Self::Store(e)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::InvalidBody {
            status,
            message: rejection.body_text(),
        }
    }
}
