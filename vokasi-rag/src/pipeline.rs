//! Retrieval-augmented answer pipeline.
//!
//! The [`RagPipeline`] turns a question into an answer in four steps:
//! retrieve the top-K chunks, join them into one context block, render the
//! answer prompt, and hand the prompt to a [`CompletionProvider`]. The
//! completion text is returned exactly as the provider produced it.
//!
//! # Example
//!
//! ```rust,ignore
//! use vokasi_rag::{RagPipeline, RagConfig, open_index};
//!
//! let index = open_index("index_db").await?;
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(index.store.clone())
//!     .collection(&index.collection)
//!     .completion_provider(Arc::new(my_llm))
//!     .build()?;
//!
//! let answer = pipeline.answer("When does registration close?").await?;
//! ```

use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};

use crate::completion::CompletionProvider;
use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::prompt::{compose_prompt, join_context};
use crate::retriever::{Retriever, VectorStoreRetriever};
use crate::vectorstore::VectorStore;

/// The answer pipeline. Construct one via [`RagPipeline::builder()`].
///
/// Holds no per-question state, so one pipeline can serve any number of
/// sessions.
pub struct RagPipeline {
    config: RagConfig,
    retriever: Arc<dyn Retriever>,
    completion_provider: Arc<dyn CompletionProvider>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer `question` from the indexed documents.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Retrieval`] if embedding or search fails and
    /// [`RagError::Completion`] if the completion provider fails. Nothing
    /// is retried and no partial answer is produced.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let span = info_span!(
            "rag.answer",
            question.len = question.len(),
            completion.model = self.completion_provider.name(),
        );
        self.answer_inner(question).instrument(span).await
    }

    async fn answer_inner(&self, question: &str) -> Result<String> {
        // 1. Retrieve the most similar chunks
        let results = self.retriever.retrieve(question).await?;

        // 2. Join into one context block and render the prompt
        let context = join_context(&results);
        let prompt = compose_prompt(&context, question);

        // 3. Ask the model
        let answer = self.completion_provider.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "completion failed");
            e
        })?;

        info!(
            chunk_count = results.len(),
            context_len = context.len(),
            prompt_len = prompt.len(),
            answer_len = answer.len(),
            "answered question"
        );

        Ok(answer)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config` and `completion_provider` are required. Retrieval is either an
/// explicit [`Retriever`] or an `embedding_provider` + `vector_store` +
/// `collection` triple, which is wrapped in a [`VectorStoreRetriever`]
/// using the configured `top_k`.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    retriever: Option<Arc<dyn Retriever>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    collection: Option<String>,
    completion_provider: Option<Arc<dyn CompletionProvider>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom retriever instead of embedding + vector store.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the embedding provider used to embed questions.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the collection searched in the vector store.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the completion provider that writes answers.
    pub fn completion_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion_provider = Some(provider);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing or the
    /// config fails [`RagConfig::validate`].
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        config.validate()?;
        let completion_provider = self
            .completion_provider
            .ok_or_else(|| RagError::Config("completion_provider is required".to_string()))?;

        let retriever = match self.retriever {
            Some(retriever) => retriever,
            None => {
                let embedding_provider = self.embedding_provider.ok_or_else(|| {
                    RagError::Config("embedding_provider or retriever is required".to_string())
                })?;
                let vector_store = self.vector_store.ok_or_else(|| {
                    RagError::Config("vector_store or retriever is required".to_string())
                })?;
                let collection = self.collection.ok_or_else(|| {
                    RagError::Config("collection or retriever is required".to_string())
                })?;
                Arc::new(VectorStoreRetriever::new(
                    embedding_provider,
                    vector_store,
                    collection,
                    config.top_k,
                )) as Arc<dyn Retriever>
            }
        };

        Ok(RagPipeline { config, retriever, completion_provider })
    }
}
