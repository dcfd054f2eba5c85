//! Embedding provider trait for turning query text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// The provider must be the same model that produced the embeddings stored
/// in the index, otherwise similarity scores are meaningless.
///
/// # Example
///
/// ```rust,ignore
/// use vokasi_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Name of the embedding model, as recorded in index manifests.
    fn model(&self) -> &str;
}
