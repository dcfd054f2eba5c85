//! Configuration for the answer pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;
/// Low temperature keeps answers focused on the retrieved context.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-1.5-flash";
/// Must match the model the index was built with.
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/embedding-001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration parameters for the answer pipeline and its providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Sampling temperature passed to the completion model.
    pub temperature: f32,
    /// Completion model name.
    pub completion_model: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Optional cap on answer length in tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Per-request timeout for provider calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            temperature: DEFAULT_TEMPERATURE,
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_output_tokens: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Check that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `top_k == 0`
    /// - `temperature` is outside `0.0..=2.0`
    /// - a model name is blank
    /// - `max_output_tokens == Some(0)` or `request_timeout_secs == 0`
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RagError::Config(format!(
                "temperature ({}) must be between 0.0 and 2.0",
                self.temperature
            )));
        }
        if self.completion_model.trim().is_empty() {
            return Err(RagError::Config("completion_model must not be empty".to_string()));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(RagError::Config("embedding_model must not be empty".to_string()));
        }
        if self.max_output_tokens == Some(0) {
            return Err(RagError::Config("max_output_tokens must be greater than zero".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(RagError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the completion sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn completion_model(mut self, model: impl Into<String>) -> Self {
        self.config.completion_model = model.into();
        self
    }

    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.config.max_output_tokens = max_output_tokens;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    /// Build the [`RagConfig`]; see [`RagConfig::validate`] for the checks.
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
