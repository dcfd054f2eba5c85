//! Loading the pre-built document index from disk.
//!
//! An index directory holds a single `index.json` manifest produced by the
//! offline indexing job:
//!
//! ```json
//! {
//!   "collection": "documents",
//!   "dimensions": 768,
//!   "embedding_model": "models/embedding-001",
//!   "chunks": [{"id": "c1", "text": "...", "embedding": [0.1, ...], "metadata": {}}]
//! }
//! ```
//!
//! The manifest is validated and loaded into an [`InMemoryVectorStore`].
//! The index is never written by the assistant.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::Chunk;
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::vectorstore::VectorStore;

/// File name of the manifest inside an index directory.
pub const INDEX_FILE: &str = "index.json";

/// On-disk layout of a persisted index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexManifest {
    /// Collection the chunks are loaded into.
    pub collection: String,
    /// Embedding dimensionality; inferred from the first chunk when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    /// Model that produced the stored embeddings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

impl IndexManifest {
    /// Read and parse `index.json` from `dir`.
    pub async fn read(dir: &Path) -> Result<Self> {
        let is_dir = tokio::fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(RagError::index(dir, "index directory not found"));
        }
        let path = dir.join(INDEX_FILE);
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            RagError::index(&path, format!("failed to read {INDEX_FILE}: {e}"))
        })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RagError::index(&path, format!("malformed {INDEX_FILE}: {e}")))
    }

    /// Check internal consistency and return the embedding dimensionality
    /// (zero for an empty index that declares none).
    pub fn validate(&self, path: &Path) -> Result<usize> {
        if self.collection.trim().is_empty() {
            return Err(RagError::index(path, "collection name must not be empty"));
        }

        let dimensions = self
            .dimensions
            .or_else(|| self.chunks.first().map(|c| c.embedding.len()))
            .unwrap_or(0);

        let mut seen = HashSet::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            if !seen.insert(chunk.id.as_str()) {
                return Err(RagError::index(path, format!("duplicate chunk id '{}'", chunk.id)));
            }
            if chunk.embedding.is_empty() {
                return Err(RagError::index(path, format!("chunk '{}' has no embedding", chunk.id)));
            }
            if chunk.embedding.len() != dimensions {
                return Err(RagError::index(
                    path,
                    format!(
                        "chunk '{}' has {} dimensions, expected {dimensions}",
                        chunk.id,
                        chunk.embedding.len()
                    ),
                ));
            }
        }

        Ok(dimensions)
    }
}

/// A validated index loaded into memory.
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub store: Arc<InMemoryVectorStore>,
    pub collection: String,
    pub dimensions: usize,
    pub chunk_count: usize,
    pub embedding_model: Option<String>,
    pub path: PathBuf,
}

impl LoadedIndex {
    /// Fail with [`RagError::Config`] if the index declares an embedding
    /// model different from `model`.
    ///
    /// `models/embedding-001` and `embedding-001` name the same model.
    pub fn check_embedding_model(&self, model: &str) -> Result<()> {
        match &self.embedding_model {
            Some(indexed) if model_id(indexed) != model_id(model) => {
                Err(RagError::Config(format!(
                    "index at {} was built with embedding model '{indexed}' but '{model}' is configured",
                    self.path.display()
                )))
            }
            _ => Ok(()),
        }
    }
}

fn model_id(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("models/").unwrap_or(name)
}

/// Open the index stored in `dir` and load it into memory.
///
/// # Errors
///
/// Returns [`RagError::Index`] if the directory or manifest is missing,
/// the manifest is malformed, chunk ids repeat, or embedding sizes differ.
pub async fn open_index(dir: impl AsRef<Path>) -> Result<LoadedIndex> {
    let dir = dir.as_ref();
    let manifest = IndexManifest::read(dir).await?;
    let dimensions = manifest.validate(&dir.join(INDEX_FILE))?;

    let store = Arc::new(InMemoryVectorStore::new());
    store.create_collection(&manifest.collection, dimensions).await?;
    store.upsert(&manifest.collection, &manifest.chunks).await?;

    let chunk_count = manifest.chunks.len();
    if chunk_count == 0 {
        warn!(path = %dir.display(), collection = %manifest.collection, "index contains no chunks");
    } else {
        info!(
            path = %dir.display(),
            collection = %manifest.collection,
            chunk_count,
            dimensions,
            "loaded index"
        );
    }

    Ok(LoadedIndex {
        store,
        collection: manifest.collection,
        dimensions,
        chunk_count,
        embedding_model: manifest.embedding_model,
        path: dir.to_path_buf(),
    })
}
