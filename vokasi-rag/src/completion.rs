//! Completion provider trait for the language model that writes answers.

use async_trait::async_trait;

use crate::error::Result;

/// A hosted language model that turns a fully composed prompt into text.
///
/// Implementations return the model's text verbatim; the pipeline performs
/// no post-processing.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit `prompt` and return the completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Name of the model, used in logs.
    fn name(&self) -> &str;
}
