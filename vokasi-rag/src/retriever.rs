//! Query-time retrieval of the chunks most similar to a question.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Returns the top-K chunks for a query, most similar first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// A [`Retriever`] that embeds the query and searches one collection of a
/// [`VectorStore`].
///
/// Results come back exactly as the store ranks them: no re-ranking,
/// threshold filtering, or deduplication.
pub struct VectorStoreRetriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
    top_k: usize,
}

impl VectorStoreRetriever {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self { embedding_provider, vector_store, collection: collection.into(), top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[async_trait]
impl Retriever for VectorStoreRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            RagError::Retrieval(format!("query embedding failed: {e}"))
        })?;

        let results = self
            .vector_store
            .search(&self.collection, &query_embedding, self.top_k)
            .await
            .map_err(|e| {
                error!(collection = %self.collection, error = %e, "vector store search failed");
                RagError::Retrieval(format!(
                    "search failed in collection '{}': {e}",
                    self.collection
                ))
            })?;

        debug!(collection = %self.collection, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }
}
