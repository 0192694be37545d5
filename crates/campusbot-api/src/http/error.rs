//! Application error type mapping to HTTP status codes and the JSON error body.
//!
//! Every error response is `{"error": <human message>, "code": <MACHINE_CODE>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use campusbot_core::chat::service::INVALID_MESSAGE;
use campusbot_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat handling errors.
    Chat(ChatError),
    /// Body was not declared as JSON.
    UnsupportedMediaType,
    /// Body was declared JSON but could not be decoded.
    MalformedJson(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => AppError::UnsupportedMediaType,
            other => AppError::MalformedJson(other.body_text()),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::InvalidInput(_)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                INVALID_MESSAGE.to_string(),
            ),
            AppError::Chat(ChatError::ContentBlocked { reason }) => (
                StatusCode::BAD_REQUEST,
                "CONTENT_BLOCKED",
                format!(
                    "Response blocked due to safety settings ({reason}). Please rephrase your message."
                ),
            ),
            AppError::Chat(ChatError::EmptyModelResponse) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMPTY_MODEL_RESPONSE",
                "Received an empty response from the AI.".to_string(),
            ),
            AppError::Chat(ChatError::Internal(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
            AppError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                "Request must be JSON".to_string(),
            ),
            AppError::MalformedJson(detail) => {
                tracing::debug!(%detail, "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_JSON",
                    "Malformed JSON request body.".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = ?self, "Request rejected");
        }

        let body = json!({
            "error": message,
            "code": code,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
