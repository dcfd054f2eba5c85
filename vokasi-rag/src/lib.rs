//! # vokasi-rag
//!
//! Retrieval-augmented question answering over a pre-built document index.
//!
//! A question goes through the [`RagPipeline`]: the [`Retriever`] embeds it
//! and fetches the top-K most similar chunks, the chunks are joined into one
//! context block, the context and question are rendered into a prompt that
//! restricts the model to that context, and a [`CompletionProvider`] writes
//! the answer. A [`ChatSession`] records each answered question.
//!
//! ## Features
//!
//! - `gemini`: [`GeminiEmbeddingProvider`] and [`GeminiCompletionProvider`]
//!   backed by the Google Gemini API.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vokasi_rag::{ChatSession, RagConfig, RagPipeline, open_index};
//!
//! let config = RagConfig::default();
//! let index = open_index("index_db").await?;
//! index.check_embedding_model(&config.embedding_model)?;
//!
//! let pipeline = RagPipeline::builder()
//!     .config(config)
//!     .embedding_provider(embedder)
//!     .vector_store(index.store.clone())
//!     .collection(&index.collection)
//!     .completion_provider(llm)
//!     .build()?;
//!
//! let mut session = ChatSession::new();
//! let answer = session.submit(&pipeline, "When is the enrollment deadline?").await?;
//! ```

pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod index;
pub mod inmemory;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod session;
pub mod vectorstore;

pub use completion::CompletionProvider;
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{ErrorKind, RagError, Result};
#[cfg(feature = "gemini")]
pub use gemini::{GeminiCompletionProvider, GeminiEmbeddingProvider};
pub use index::{INDEX_FILE, IndexManifest, LoadedIndex, open_index};
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::{REFUSAL_PHRASE, compose_prompt, join_context};
pub use retriever::{Retriever, VectorStoreRetriever};
pub use session::{ChatSession, ChatTurn, Role, SessionState};
pub use vectorstore::VectorStore;
