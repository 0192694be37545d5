//! Chat service handling one user message end to end.
//!
//! `ChatService::handle` resolves (or creates) the session, makes exactly one
//! model call with the accumulated history, validates the response, and
//! persists the updated history. Persistence on failure paths is best effort:
//! its outcome is logged and never changes what the caller gets back.

use std::sync::Arc;

use campusbot_types::chat::{ChatReply, History, Turn};
use campusbot_types::error::ChatError;
use campusbot_types::llm::{GenerateRequest, GenerationConfig};
use tracing::{error, info, warn};

use crate::history::adapter::{HistoryStoreAdapter, StoredHistory};
use crate::history::session_id::generate_session_id;
use crate::history::store::HistoryStore;
use crate::llm::provider::LlmProvider;

/// Message returned for blank or missing user input.
pub const INVALID_MESSAGE: &str = "Invalid message provided.";

/// Characters of the outgoing message included in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

/// Fixed persona and sampling parameters applied to every request.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_instruction: String,
    pub generation: GenerationConfig,
}

/// Orchestrates the session-history lifecycle around a single model call.
///
/// Generic over `HistoryStore` and `LlmProvider` so the core never depends
/// on campusbot-infra; tests plug in in-memory doubles.
pub struct ChatService<S: HistoryStore, P: LlmProvider> {
    history: HistoryStoreAdapter<S>,
    provider: P,
    base_history: Arc<[Turn]>,
    settings: ChatSettings,
}

impl<S: HistoryStore, P: LlmProvider> ChatService<S, P> {
    /// Create a chat service.
    ///
    /// `base_history` is shared read-only; every new session starts from a
    /// copy of it.
    pub fn new(store: S, provider: P, base_history: Arc<[Turn]>, settings: ChatSettings) -> Self {
        Self {
            history: HistoryStoreAdapter::new(store),
            provider,
            base_history,
            settings,
        }
    }

    /// Access the history store adapter.
    pub fn history(&self) -> &HistoryStoreAdapter<S> {
        &self.history
    }

    /// Access the model provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The seed conversation new sessions start from.
    pub fn base_history(&self) -> &[Turn] {
        &self.base_history
    }

    /// Handle one user message.
    ///
    /// An unknown or unusable `session_id` silently starts a new session; the
    /// id actually used is returned in the reply.
    pub async fn handle(
        &self,
        session_id: Option<&str>,
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::InvalidInput(INVALID_MESSAGE.to_string()));
        }

        let (session_id, history) = self.resolve_session(session_id).await;

        let request = GenerateRequest {
            history,
            message: message.to_string(),
            system_instruction: Some(self.settings.system_instruction.clone()),
            generation: self.settings.generation.clone(),
        };

        info!(
            session_id = %session_id,
            provider = self.provider.name(),
            preview = %preview(message),
            "Sending message to model"
        );

        let response = match self.provider.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Model call failed");
                self.save_user_turn_only(&session_id, request.history, message)
                    .await;
                return Err(ChatError::Internal(e.to_string()));
            }
        };

        if let Some(reason) = response.block_reason() {
            warn!(session_id = %session_id, %reason, "Response blocked");
            let reason = reason.to_string();
            self.save_user_turn_only(&session_id, request.history, message)
                .await;
            return Err(ChatError::ContentBlocked { reason });
        }

        let Some(reply) = response.text() else {
            error!(session_id = %session_id, "Model returned an empty or invalid response structure");
            self.save_user_turn_only(&session_id, request.history, message)
                .await;
            return Err(ChatError::EmptyModelResponse);
        };

        info!(session_id = %session_id, "Received response from model");

        let mut history = request.history;
        history.push(Turn::user(message));
        history.push(Turn::model(reply.clone()));

        if !self.history.save(&session_id, &history).await {
            error!(session_id = %session_id, "CRITICAL: failed to save updated history");
        }

        Ok(ChatReply { reply, session_id })
    }

    /// Adopt the stored history for `requested`, or start a fresh session.
    async fn resolve_session(&self, requested: Option<&str>) -> (String, History) {
        if let Some(id) = requested.filter(|id| !id.is_empty()) {
            match self.history.load(id).await {
                StoredHistory::Found(history) => return (id.to_string(), history),
                StoredHistory::Absent => {
                    info!(
                        session_id = %id,
                        "Provided session ID not found or history invalid, starting new session"
                    );
                }
            }
        }

        let session_id = generate_session_id();
        info!(session_id = %session_id, "Initializing new session with base history");
        (session_id, self.base_history.to_vec())
    }

    /// Record the user side of a failed exchange. Outcome is only logged.
    async fn save_user_turn_only(&self, session_id: &str, mut history: History, message: &str) {
        history.push(Turn::user(message));
        if !self.history.save(session_id, &history).await {
            warn!(session_id = %session_id, "Could not record user turn of failed exchange");
        }
    }
}

fn preview(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
