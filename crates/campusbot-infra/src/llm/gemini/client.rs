//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends one non-streaming request per call to
//! `{base_url}/v1beta/models/{model}:generateContent`, authenticated with the
//! `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use campusbot_core::llm::provider::LlmProvider;
use campusbot_types::chat::{Part, Turn};
use campusbot_types::llm::{
    Candidate, CandidateContent, GenerateRequest, LlmError, ModelResponse, PromptFeedback, Usage,
};

use super::types::{
    ApiErrorEnvelope, Content, GeminiGenerationConfig, GenerateContentRequest,
    GenerateContentResponse, TextPart,
};

/// Overall timeout for one generation request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Google Gemini LLM provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// `base_url` is the API root without a trailing path, e.g.
    /// `https://generativelanguage.googleapis.com`.
    pub fn new(api_key: SecretString, model: String, base_url: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// The model this provider calls.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn to_gemini_request(request: &GenerateRequest) -> GenerateContentRequest {
        let contents = request.contents().iter().map(to_content).collect();

        let system_instruction = request.system_instruction.as_ref().map(|text| Content {
            role: None,
            parts: vec![TextPart { text: text.clone() }],
        });

        let g = &request.generation;
        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GeminiGenerationConfig {
                temperature: g.temperature,
                top_p: g.top_p,
                top_k: g.top_k,
                max_output_tokens: g.max_output_tokens,
            },
        }
    }
}

fn to_content(turn: &Turn) -> Content {
    Content {
        role: Some(turn.role.to_string()),
        parts: turn
            .parts
            .iter()
            .map(|p| TextPart {
                text: p.text.clone(),
            })
            .collect(),
    }
}

fn to_model_response(resp: GenerateContentResponse) -> ModelResponse {
    let candidates = resp
        .candidates
        .into_iter()
        .map(|c| Candidate {
            content: c.content.map(|content| CandidateContent {
                parts: content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text.map(Part::text))
                    .collect(),
            }),
            finish_reason: c.finish_reason,
        })
        .collect();

    ModelResponse {
        candidates,
        prompt_feedback: resp.prompt_feedback.map(|f| PromptFeedback {
            block_reason: f.block_reason,
        }),
        usage: resp.usage_metadata.map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        }),
    }
}

/// Pull the human-readable message out of a Gemini error body, if any.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| body.to_string())
}

fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

// GeminiProvider does not derive Debug; the SecretString already redacts,
// but the client and URL carry nothing worth printing either.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelResponse, LlmError> {
        let body = Self::to_gemini_request(request);

        tracing::debug!(
            model = %self.model,
            turns = body.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: retry_after,
                },
                503 => LlmError::Overloaded(error_message(&error_body)),
                400 => LlmError::InvalidRequest(error_message(&error_body)),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {}", error_message(&error_body)),
                },
            });
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let model_response = to_model_response(gemini_resp);
        if let Some(usage) = &model_response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "generateContent usage"
            );
        }

        Ok(model_response)
    }
}
