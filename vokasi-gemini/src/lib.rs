//! # vokasi-gemini
//!
//! A small async client for the two Gemini REST endpoints the assistant
//! needs: `generateContent` for answers and `embedContent` for query
//! embeddings.
//!
//! ```rust,no_run
//! use vokasi_gemini::{Gemini, Model, TaskType};
//!
//! # async fn run() -> Result<(), vokasi_gemini::Error> {
//! let chat = Gemini::with_model("api-key", Model::Gemini15Flash)?;
//! let reply = chat
//!     .generate_content()
//!     .with_user_message("Hello")
//!     .with_temperature(0.3)
//!     .execute()
//!     .await?;
//! println!("{}", reply.text());
//!
//! let embedder = Gemini::with_model("api-key", Model::Embedding001)?;
//! let embedding = embedder
//!     .embed_content()
//!     .with_text("Hello")
//!     .with_task_type(TaskType::RetrievalQuery)
//!     .execute()
//!     .await?;
//! println!("{} dimensions", embedding.embedding.values.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod embedding;
mod generation;


pub use client::{DEFAULT_BASE_URL, Error, Gemini, GeminiBuilder, Model};
pub use embedding::{ContentEmbedding, ContentEmbeddingResponse, EmbedBuilder, EmbedContentRequest, TaskType};
pub use generation::{
    Candidate, Content, ContentBuilder, FinishReason, GenerateContentRequest, GenerationConfig,
    GenerationResponse, Part, PromptFeedback, Role, UsageMetadata,
};
