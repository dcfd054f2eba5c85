//! Command-line arguments.
//!
//! Every option can also be set through a `VOKASI_*` environment variable.

use std::path::PathBuf;

use clap::Parser;
use vokasi_rag::config::{
    DEFAULT_COMPLETION_MODEL, DEFAULT_EMBEDDING_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TEMPERATURE, DEFAULT_TOP_K,
};
use vokasi_rag::{RagConfig, Result};
use vokasi_telemetry::LogFormat;

pub const DEFAULT_INDEX_DIR: &str = "index_db";
pub const DEFAULT_SECRETS_FILE: &str = ".vokasi/secrets.toml";

/// Ask questions about your documents from the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "vokasi", version, about)]
pub struct Cli {
    /// Directory holding the pre-built index (`index.json`).
    #[arg(long, env = "VOKASI_INDEX_DIR", default_value = DEFAULT_INDEX_DIR)]
    pub index_dir: PathBuf,

    /// Number of document chunks retrieved per question.
    #[arg(short = 'k', long, env = "VOKASI_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Gemini model that writes the answers.
    #[arg(long, env = "VOKASI_COMPLETION_MODEL", default_value = DEFAULT_COMPLETION_MODEL)]
    pub completion_model: String,

    /// Gemini model that embeds questions; must match the index.
    #[arg(long, env = "VOKASI_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Sampling temperature, 0.0 to 2.0.
    #[arg(long, env = "VOKASI_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Cap on answer length in tokens.
    #[arg(long, env = "VOKASI_MAX_OUTPUT_TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Timeout for each Gemini request, in seconds.
    #[arg(long, env = "VOKASI_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// TOML file consulted for `GOOGLE_API_KEY` when it is not in the environment.
    #[arg(long, env = "VOKASI_SECRETS_FILE", default_value = DEFAULT_SECRETS_FILE)]
    pub secrets_file: PathBuf,

    /// Log output format: `text` or `json`.
    #[arg(long, env = "VOKASI_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "VOKASI_LOG", default_value = "warn")]
    pub log_filter: String,
}

impl Cli {
    /// Validate the pipeline settings.
    pub fn rag_config(&self) -> Result<RagConfig> {
        RagConfig::builder()
            .top_k(self.top_k)
            .temperature(self.temperature)
            .completion_model(&self.completion_model)
            .embedding_model(&self.embedding_model)
            .max_output_tokens(self.max_output_tokens)
            .request_timeout_secs(self.timeout_secs)
            .build()
    }
}
