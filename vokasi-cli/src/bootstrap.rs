//! Startup: load the index, create the providers, assemble the pipeline.
//!
//! Everything here is fatal. The REPL only starts once an [`Assistant`]
//! exists.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use vokasi_rag::{
    CompletionProvider, EmbeddingProvider, GeminiCompletionProvider, GeminiEmbeddingProvider,
    LoadedIndex, RagConfig, RagPipeline, open_index,
};

use crate::args::Cli;
use crate::credentials::ApiKey;

/// A ready-to-use pipeline and the index it searches.
pub struct Assistant {
    pub pipeline: RagPipeline,
    pub index: LoadedIndex,
}

impl Assistant {
    /// Build the Gemini-backed assistant described by `cli`.
    pub async fn connect(cli: &Cli, api_key: &ApiKey) -> anyhow::Result<Self> {
        let config = cli.rag_config().context("invalid configuration")?;
        let embedder = GeminiEmbeddingProvider::from_config(api_key.expose(), &config)?;
        let completer = GeminiCompletionProvider::from_config(api_key.expose(), &config)?;
        Self::assemble(config, &cli.index_dir, Arc::new(embedder), Arc::new(completer)).await
    }

    /// Open the index at `index_dir` and wire it to the given providers.
    ///
    /// Fails if the index cannot be loaded or was embedded with a model
    /// other than `config.embedding_model`.
    pub async fn assemble(
        config: RagConfig,
        index_dir: &Path,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
    ) -> anyhow::Result<Self> {
        let index = open_index(index_dir)
            .await
            .with_context(|| format!("failed to open index at {}", index_dir.display()))?;
        index.check_embedding_model(&config.embedding_model)?;

        info!(
            collection = %index.collection,
            chunk_count = index.chunk_count,
            top_k = config.top_k,
            completion_model = completer.name(),
            embedding_model = embedder.model(),
            "assistant ready"
        );

        let pipeline = RagPipeline::builder()
            .config(config)
            .embedding_provider(embedder)
            .vector_store(index.store.clone())
            .collection(index.collection.clone())
            .completion_provider(completer)
            .build()?;

        Ok(Self { pipeline, index })
    }
}
