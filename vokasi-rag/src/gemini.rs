//! Gemini-backed embedding and completion providers.
//!
//! This module is only available when the `gemini` feature is enabled.

use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use vokasi_gemini::{Gemini, GenerationResponse, TaskType};

use crate::completion::CompletionProvider;
use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const PROVIDER: &str = "Gemini";

/// Render an error with its whole source chain; the top-level message of a
/// request failure alone does not say what went wrong.
fn describe(e: &vokasi_gemini::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn build_client(api_key: &str, model: &str, timeout: Duration) -> Result<Gemini> {
    Gemini::builder(api_key).model(model).timeout(timeout).build().map_err(|e| {
        RagError::Config(format!("failed to create Gemini client for '{model}': {}", describe(&e)))
    })
}

/// An [`EmbeddingProvider`] backed by the Gemini `embedContent` API.
///
/// Queries are embedded with [`TaskType::RetrievalQuery`], the counterpart
/// of the document task type used when the index was built.
pub struct GeminiEmbeddingProvider {
    client: Gemini,
}

impl GeminiEmbeddingProvider {
    /// Create a provider for the configured embedding model.
    pub fn from_config(api_key: &str, config: &RagConfig) -> Result<Self> {
        let client = build_client(
            api_key,
            &config.embedding_model,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing [`Gemini`] client.
    pub fn from_client(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding query");

        let response = self
            .client
            .embed_content()
            .with_text(text)
            .with_task_type(TaskType::RetrievalQuery)
            .execute()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "embedding request failed");
                RagError::Embedding { provider: PROVIDER.into(), message: describe(&e) }
            })?;

        if response.embedding.values.is_empty() {
            return Err(RagError::Embedding {
                provider: PROVIDER.into(),
                message: "API returned an empty embedding".into(),
            });
        }
        Ok(response.embedding.values)
    }

    fn model(&self) -> &str {
        self.client.model().as_str()
    }
}

/// A [`CompletionProvider`] backed by the Gemini `generateContent` API.
///
/// The prompt is sent as a single user message.
pub struct GeminiCompletionProvider {
    client: Gemini,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl GeminiCompletionProvider {
    /// Create a provider for the configured completion model, temperature,
    /// and output limit.
    pub fn from_config(api_key: &str, config: &RagConfig) -> Result<Self> {
        let client = build_client(
            api_key,
            &config.completion_model,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self {
            client,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

/// Answer text of a response, or a completion error naming why there is none.
fn completion_text(response: GenerationResponse) -> Result<String> {
    let text = response.text();
    if !text.is_empty() {
        return Ok(text);
    }

    let reason = response
        .prompt_feedback
        .and_then(|f| f.block_reason)
        .map(|r| format!("prompt blocked: {r}"))
        .or_else(|| {
            response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_ref())
                .map(|r| format!("finish reason: {r:?}"))
        })
        .unwrap_or_else(|| "no candidates returned".to_string());
    error!(provider = PROVIDER, %reason, "completion returned no text");
    Err(RagError::Completion { provider: PROVIDER.into(), message: format!("empty response ({reason})") })
}

#[async_trait]
impl CompletionProvider for GeminiCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(provider = PROVIDER, prompt_len = prompt.len(), "requesting completion");

        let mut request = self
            .client
            .generate_content()
            .with_user_message(prompt)
            .with_temperature(self.temperature);
        if let Some(max_output_tokens) = self.max_output_tokens {
            let max_output_tokens = i32::try_from(max_output_tokens).unwrap_or(i32::MAX);
            request = request.with_max_output_tokens(max_output_tokens);
        }

        let response = request.execute().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "completion request failed");
            RagError::Completion { provider: PROVIDER.into(), message: describe(&e) }
        })?;

        completion_text(response)
    }

    fn name(&self) -> &str {
        self.client.model().as_str()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn providers_pick_models_from_config() {
        let config = RagConfig::builder()
            .completion_model("gemini-2.5-flash")
            .embedding_model("embedding-001")
            .build()
            .unwrap();

        let embedder = GeminiEmbeddingProvider::from_config("test-key", &config).unwrap();
        let completer = GeminiCompletionProvider::from_config("test-key", &config).unwrap();

        assert_eq!(embedder.model(), "models/embedding-001");
        assert_eq!(completer.name(), "models/gemini-2.5-flash");
    }

    #[test]
    fn blank_key_is_a_configuration_error() {
        let err = GeminiCompletionProvider::from_config("", &RagConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn completion_settings_follow_config() {
        let config = RagConfig::builder()
            .temperature(0.0)
            .max_output_tokens(Some(512))
            .build()
            .unwrap();
        let provider = GeminiCompletionProvider::from_config("test-key", &config).unwrap();
        assert_eq!(provider.temperature, 0.0);
        assert_eq!(provider.max_output_tokens, Some(512));
    }

    fn response(value: serde_json::Value) -> GenerationResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn answer_text_is_returned() {
        let text = completion_text(response(json!({
            "candidates": [{
                "content": {"parts": [{"text": "The campus opens at 7 AM."}], "role": "model"},
                "finishReason": "STOP"
            }]
        })))
        .unwrap();
        assert_eq!(text, "The campus opens at 7 AM.");
    }

    #[test]
    fn blocked_prompt_names_the_block_reason() {
        let err = completion_text(response(json!({"promptFeedback": {"blockReason": "SAFETY"}})))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Completion);
        assert!(err.to_string().contains("prompt blocked: SAFETY"), "{err}");
    }

    #[test]
    fn textless_candidate_names_the_finish_reason() {
        let err = completion_text(response(json!({
            "candidates": [{"content": {"parts": [], "role": "model"}, "finishReason": "MAX_TOKENS"}]
        })))
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Completion);
        assert!(err.to_string().contains("finish reason: MaxTokens"), "{err}");
    }

    #[test]
    fn missing_candidates_are_reported() {
        let err = completion_text(response(json!({}))).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Completion);
        assert!(err.to_string().contains("no candidates returned"), "{err}");
    }
}
