//! # vokasi-cli
//!
//! The `vokasi` terminal assistant: resolves credentials, opens the index,
//! and runs a chat loop over a [`vokasi_rag::RagPipeline`].

pub mod args;
pub mod bootstrap;
pub mod credentials;
pub mod repl;

pub use args::Cli;
pub use bootstrap::Assistant;
pub use credentials::{ApiKey, KeySource, resolve_api_key};
