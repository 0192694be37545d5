//! Chat endpoint.
//!
//! POST /api/chat
//!
//! Body `{"message": "...", "sessionId": "..."}`; `sessionId` is optional.
//! Replies `{"response": "...", "sessionId": "..."}` with the session the
//! exchange was recorded under, which is new when the given one was unknown.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Kept untyped so a non-string message is reported as invalid input
    /// rather than as a malformed body.
    #[serde(default)]
    pub message: Option<Value>,
    /// Untyped for the same reason: anything other than a non-empty string
    /// starts a new session.
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<Value>,
}

/// Response body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// POST /api/chat - Send one message and get the model's reply.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = payload?;

    let message = body.message.as_ref().and_then(Value::as_str).unwrap_or("");
    let session_id = body
        .session_id
        .as_ref()
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());

    let reply = state.chat_service.handle(session_id, message).await?;

    Ok(Json(ChatResponse {
        response: reply.reply,
        session_id: reply.session_id,
    }))
}
