//! Gemini API key resolution.
//!
//! Lookup order: `GOOGLE_API_KEY`, `GEMINI_API_KEY`, then the `GOOGLE_API_KEY`
//! entry of the secrets file. Blank values count as absent.

use std::fmt;
use std::path::Path;

use anyhow::{Context, bail};
use tracing::debug;

/// Environment variables checked, in order.
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];
/// Key looked up in the secrets file.
pub const SECRETS_KEY: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env(&'static str),
    SecretsFile,
}

/// A resolved API key. `Debug` never prints the value.
#[derive(Clone)]
pub struct ApiKey {
    value: String,
    source: KeySource,
}

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> KeySource {
        self.source
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey").field("value", &"<redacted>").field("source", &self.source).finish()
    }
}

/// Resolve the key from the process environment and `secrets_file`.
pub fn resolve_api_key(secrets_file: &Path) -> anyhow::Result<ApiKey> {
    resolve_with(|name| std::env::var(name).ok(), secrets_file)
}

/// Resolve the key using `lookup` in place of the process environment.
pub fn resolve_with(
    lookup: impl Fn(&str) -> Option<String>,
    secrets_file: &Path,
) -> anyhow::Result<ApiKey> {
    for name in API_KEY_VARS {
        if let Some(value) = lookup(name).and_then(non_blank) {
            debug!(source = name, "using API key from environment");
            return Ok(ApiKey { value, source: KeySource::Env(name) });
        }
    }

    if let Some(value) = read_secrets_file(secrets_file)? {
        debug!(path = %secrets_file.display(), "using API key from secrets file");
        return Ok(ApiKey { value, source: KeySource::SecretsFile });
    }

    bail!("{}", missing_key_help(secrets_file))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// `Ok(None)` when the file or its key is absent.
fn read_secrets_file(path: &Path) -> anyhow::Result<Option<String>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read secrets file {}", path.display()));
        }
    };

    let table: toml::Table = toml::from_str(&raw)
        .with_context(|| format!("secrets file {} is not valid TOML", path.display()))?;

    match table.get(SECRETS_KEY) {
        None => Ok(None),
        Some(toml::Value::String(value)) => Ok(non_blank(value.clone())),
        Some(_) => bail!("{SECRETS_KEY} in {} must be a string", path.display()),
    }
}

fn missing_key_help(secrets_file: &Path) -> String {
    format!(
        "Google AI API key not found.\n\
         \n\
         To set your API key, either:\n  \
         1. export GOOGLE_API_KEY=\"<your key>\" (GEMINI_API_KEY or a .env file also work), or\n  \
         2. create {} containing the line:\n       \
         {SECRETS_KEY} = \"<your key>\"",
        secrets_file.display()
    )
}
