//! LlmProvider trait definition.

use campusbot_types::llm::{GenerateRequest, LlmError, ModelResponse};

/// Trait for LLM provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). A provider is
/// stateless across calls: every request carries the full history, which
/// replaces the start-session-then-send-message dance of chat SDKs.
///
/// Implementations live in campusbot-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send `request.history` plus `request.message` and return the raw
    /// response. Safety blocks and empty candidates are NOT errors here; the
    /// caller inspects the returned [`ModelResponse`].
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<ModelResponse, LlmError>> + Send;
}
