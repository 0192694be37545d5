//! LLM request/response types for campusbot.
//!
//! Provider-agnostic shapes for a single `generate` call: the request built
//! by the chat handler and the response it validates. Wire formats of a
//! specific provider live next to that provider in `campusbot-infra`.

use serde::{Deserialize, Serialize};

use crate::chat::{History, Part, Turn};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f64 {
    1.0
}

fn default_top_p() -> f64 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    8192
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// One generation request: prior history plus the new user message.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Conversation so far (seed turns included). Does not contain `message`.
    pub history: History,
    /// The new user message, sent as the final user turn.
    pub message: String,
    pub system_instruction: Option<String>,
    pub generation: GenerationConfig,
}

impl GenerateRequest {
    /// History followed by the new user turn, in send order.
    pub fn contents(&self) -> Vec<Turn> {
        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend(self.history.iter().cloned());
        contents.push(Turn::user(self.message.clone()));
        contents
    }
}

/// Content of a response candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateContent {
    pub parts: Vec<Part>,
}

/// One generated alternative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Absent when the provider withheld the content (e.g. a safety stop).
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFeedback {
    /// Set when the prompt was blocked by content-safety policy.
    pub block_reason: Option<String>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Response to a [`GenerateRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage: Option<Usage>,
}

impl ModelResponse {
    /// Shorthand for a single-candidate text response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![Part::text(text)],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
            usage: None,
        }
    }

    /// Shorthand for a response whose prompt was blocked.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some(reason.into()),
            }),
            usage: None,
        }
    }

    /// Block reason from prompt feedback, if the prompt was blocked.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }

    /// Reply text of the first candidate.
    ///
    /// `None` when there is no candidate, the first candidate has no content,
    /// or its content has no parts.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
