//! # vokasi-telemetry
//!
//! Installs the process-wide `tracing` subscriber.
//!
//! Log lines go to stderr so they never mix with the chat transcript on
//! stdout. Verbosity comes from `RUST_LOG`; when it is unset or invalid the
//! caller's default directive applies.
//!
//! ```rust,ignore
//! use vokasi_telemetry::{LogFormat, init_telemetry};
//!
//! init_telemetry(LogFormat::Text, "warn")?;
//! tracing::warn!("only warnings and errors by default");
//! ```

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("unknown log format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),

    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    /// A global subscriber is already installed.
    #[error("telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the level filter: `RUST_LOG` when set and valid, else `default_directive`.
pub fn build_filter(default_directive: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: default_directive.to_string(),
        message: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if `default_directive` does not parse or a subscriber has already
/// been installed in this process.
pub fn init_telemetry(format: LogFormat, default_directive: &str) -> Result<(), TelemetryError> {
    let filter = build_filter(default_directive)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
