//! Error types for the `vokasi-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or running the answer pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// Missing or invalid configuration, including credentials.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The persisted index could not be opened or is inconsistent.
    #[error("Index error ({}): {message}", path.display())]
    Index {
        /// Location of the index that failed to load.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Retrieval failed for a query; wraps an embedding or store failure.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The completion provider failed or returned an unusable response.
    #[error("Completion error ({provider}): {message}")]
    Completion {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// Coarse classification used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal at startup: the pipeline cannot be constructed.
    Configuration,
    /// Fatal for one query: the index or embedding provider failed.
    Retrieval,
    /// Fatal for one query: the completion provider failed.
    Completion,
}

impl RagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RagError::Config(_) | RagError::Index { .. } => ErrorKind::Configuration,
            RagError::Embedding { .. } | RagError::VectorStore { .. } | RagError::Retrieval(_) => {
                ErrorKind::Retrieval
            }
            RagError::Completion { .. } => ErrorKind::Completion,
        }
    }

    pub(crate) fn index(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RagError::Index { path: path.into(), message: message.into() }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
