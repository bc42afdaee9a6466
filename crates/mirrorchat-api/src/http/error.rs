//! Application error type mapping to HTTP status codes and `{error}` bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use mirrorchat_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
///
/// Messages are fixed strings; detailed causes are logged where the error is
/// converted, never returned to the client.
#[derive(Debug)]
pub enum AppError {
    /// The service behind the endpoint could not be built at startup.
    NotConfigured,
    /// Token verification failed. Holds the reason shown to the client.
    Unauthorized(String),
    /// Missing fields or a malformed body.
    BadRequest,
    /// The model call for the reply failed.
    Generation,
    /// Any other server-side failure, with its client-facing message.
    Internal(&'static str),
}

impl AppError {
    /// Map a `/chat` failure.
    pub fn chat(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => AppError::NotConfigured,
            ChatError::Authentication(e) => AppError::Unauthorized(e.to_string()),
            ChatError::Validation(_) => AppError::BadRequest,
            ChatError::Generation(e) => {
                tracing::error!(error = %e, "Chat generation failed");
                AppError::Generation
            }
            ChatError::Persistence(e) => {
                tracing::error!(error = %e, "Chat persistence failed");
                AppError::Internal("Failed to process chat message.")
            }
        }
    }

    /// Map a `/delete-data` failure.
    pub fn delete(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => AppError::NotConfigured,
            ChatError::Authentication(e) => AppError::Unauthorized(e.to_string()),
            ChatError::Validation(_) => AppError::BadRequest,
            other => {
                tracing::error!(error = %other, "Data deletion failed");
                AppError::Internal("Failed to delete data.")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::BadRequest
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server is not configured correctly.".to_string(),
            ),
            AppError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                format!("Authentication failed: {reason}"),
            ),
            AppError::BadRequest => (StatusCode::BAD_REQUEST, "Invalid request.".to_string()),
            AppError::Generation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate AI response.".to_string(),
            ),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
