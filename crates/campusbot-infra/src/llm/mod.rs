//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `campusbot-core`, and a factory ([`create_provider`]) that builds it from
//! [`ModelConfig`] plus the API key taken from the environment.
//!
//! [`LlmProvider`]: campusbot_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use campusbot_types::config::ModelConfig;
use campusbot_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Read the API key from [`API_KEY_ENV`]. Empty values count as missing.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`GeminiProvider`] from model configuration.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is available.
pub fn create_provider(
    config: &ModelConfig,
    api_key: Option<SecretString>,
) -> Result<GeminiProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    GeminiProvider::new(key, config.name.clone(), config.base_url.clone())
}
