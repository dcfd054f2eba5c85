use std::{
    fmt::{self, Formatter},
    sync::Arc,
    time::Duration,
};

use reqwest::{
    Client, Response,
    header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};
use tracing::{Level, Span, instrument};
use url::Url;

use crate::{
    embedding::{ContentEmbeddingResponse, EmbedBuilder, EmbedContentRequest},
    generation::{ContentBuilder, GenerateContentRequest, GenerationResponse},
};

/// Base URL of the public Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    #[default]
    Gemini15Flash,
    Gemini25Flash,
    Embedding001,
    TextEmbedding004,
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini15Flash => "models/gemini-1.5-flash",
            Model::Gemini25Flash => "models/gemini-2.5-flash",
            Model::Embedding001 => "models/embedding-001",
            Model::TextEmbedding004 => "models/text-embedding-004",
            Model::Custom(model) => model,
        }
    }
}

impl From<&str> for Model {
    /// Accepts both bare names (`gemini-1.5-flash`) and resource paths
    /// (`models/gemini-1.5-flash`, `tunedModels/...`).
    fn from(name: &str) -> Self {
        let name = name.trim();
        let path = if name.contains('/') { name.to_string() } else { format!("models/{name}") };
        match path.as_str() {
            "models/gemini-1.5-flash" => Model::Gemini15Flash,
            "models/gemini-2.5-flash" => Model::Gemini25Flash,
            "models/embedding-001" => Model::Embedding001,
            "models/text-embedding-004" => Model::TextEmbedding004,
            _ => Model::Custom(path),
        }
    }
}

impl From<String> for Model {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("API key must not be empty"))]
    MissingApiKey,

    #[snafu(display("failed to parse API key"))]
    InvalidApiKey { source: InvalidHeaderValue },

    #[snafu(display("invalid base URL '{url}'"))]
    InvalidBaseUrl { source: url::ParseError, url: String },

    #[snafu(display("failed to build HTTP client"))]
    BuildClient { source: reqwest::Error },

    #[snafu(display("failed to construct URL (probably incorrect model name): {suffix}"))]
    ConstructUrl { source: url::ParseError, suffix: String },

    #[snafu(display("failed to perform request to '{url}'"))]
    PerformRequest { source: reqwest::Error, url: Url },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        /// HTTP status code
        code: u16,
        /// Error message reported by the API, or the raw body
        description: Option<String>,
    },

    #[snafu(display("failed to decode response body"))]
    DecodeResponse { source: reqwest::Error },
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Internal client for making requests to the Gemini API
#[derive(Debug)]
pub(crate) struct GeminiClient {
    http_client: Client,
    pub(crate) model: Model,
    base_url: Url,
}

impl GeminiClient {
    /// Check the response status code and return an error if it is not successful
    #[tracing::instrument(skip_all, err)]
    async fn check_response(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let description = response.text().await.ok().map(|body| {
            serde_json::from_str::<ApiErrorBody>(&body).map(|e| e.error.message).unwrap_or(body)
        });
        BadResponseSnafu { code: status.as_u16(), description }.fail()
    }

    /// Build a URL for the API
    #[tracing::instrument(skip(self), ret(level = Level::DEBUG))]
    pub(crate) fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        let suffix = format!("{}:{endpoint}", self.model);
        self.base_url.join(&suffix).context(ConstructUrlSnafu { suffix })
    }

    #[tracing::instrument(skip(self, body), fields(request.url = %url))]
    async fn post_json<Req: Serialize, Res: DeserializeOwned>(
        &self,
        url: Url,
        body: &Req,
    ) -> Result<Res, Error> {
        let response = self
            .http_client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .context(PerformRequestSnafu { url })?;
        tracing::debug!("response received successfully");
        let response = Self::check_response(response).await?;
        response.json().await.context(DecodeResponseSnafu)
    }

    /// Generate content
    #[instrument(skip_all, fields(
        model = %self.model,
        messages.parts.count = request.contents.len(),
        usage.prompt_tokens,
        usage.candidates_tokens,
        usage.total_tokens,
    ), err)]
    pub(crate) async fn generate_content_raw(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.build_url("generateContent")?;
        let response: GenerationResponse = self.post_json(url, &request).await?;

        if let Some(usage) = &response.usage_metadata {
            #[rustfmt::skip]
            Span::current()
                .record("usage.prompt_tokens", usage.prompt_token_count)
                .record("usage.candidates_tokens", usage.candidates_token_count)
                .record("usage.total_tokens", usage.total_token_count);

            tracing::debug!("generation usage evaluated");
        }

        Ok(response)
    }

    /// Embed content
    #[instrument(skip_all, fields(
        model = %self.model,
        task.type = request.task_type.as_ref().map(|t| format!("{t:?}")),
    ), err)]
    pub(crate) async fn embed_content(
        &self,
        request: EmbedContentRequest,
    ) -> Result<ContentEmbeddingResponse, Error> {
        let url = self.build_url("embedContent")?;
        self.post_json(url, &request).await
    }
}

/// Handle to the Gemini API bound to one model.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Gemini {
    client: Arc<GeminiClient>,
}

impl Gemini {
    /// Create a client for the default chat model.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self, Error> {
        Self::with_model(api_key, Model::default())
    }

    /// Create a client for a specific model.
    pub fn with_model(api_key: impl AsRef<str>, model: impl Into<Model>) -> Result<Self, Error> {
        Self::builder(api_key).model(model).build()
    }

    /// Start a [`GeminiBuilder`] for finer control (base URL, timeout).
    pub fn builder(api_key: impl AsRef<str>) -> GeminiBuilder {
        GeminiBuilder {
            api_key: api_key.as_ref().to_string(),
            model: Model::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn model(&self) -> &Model {
        &self.client.model
    }

    /// Start building a `generateContent` request.
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.client.clone())
    }

    /// Start building an `embedContent` request.
    pub fn embed_content(&self) -> EmbedBuilder {
        EmbedBuilder::new(self.client.clone())
    }

    #[cfg(test)]
    pub(crate) fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        self.client.build_url(endpoint)
    }
}

/// Builder for [`Gemini`].
#[derive(Debug, Clone)]
pub struct GeminiBuilder {
    api_key: String,
    model: Model,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiBuilder {
    pub fn model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (proxies, regional endpoints).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout covering connect, send, and body download.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Gemini, Error> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return MissingApiKeySnafu.fail();
        }

        let mut key_header = HeaderValue::from_str(api_key).context(InvalidApiKeySnafu)?;
        key_header.set_sensitive(true);
        let headers = HeaderMap::from_iter([(HeaderName::from_static("x-goog-api-key"), key_header)]);

        // Url::join drops the last path segment unless the base ends in '/'.
        let base_url = if self.base_url.ends_with('/') {
            self.base_url
        } else {
            format!("{}/", self.base_url)
        };
        let base_url =
            Url::parse(&base_url).context(InvalidBaseUrlSnafu { url: base_url.clone() })?;

        let mut client_builder = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let http_client = client_builder.build().context(BuildClientSnafu)?;

        Ok(Gemini { client: Arc::new(GeminiClient { http_client, model: self.model, base_url }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_from_bare_name_gets_models_prefix() {
        assert_eq!(Model::from("gemini-1.5-flash"), Model::Gemini15Flash);
        assert_eq!(Model::from("models/embedding-001"), Model::Embedding001);
        assert_eq!(
            Model::from("gemini-2.0-pro"),
            Model::Custom("models/gemini-2.0-pro".to_string())
        );
        assert_eq!(Model::from("tunedModels/my-tune").as_str(), "tunedModels/my-tune");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = Gemini::new("   ").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn build_url_joins_model_and_endpoint() {
        let client = Gemini::with_model("test-key", Model::Embedding001).unwrap();
        let url = client.build_url("embedContent").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:embedContent"
        );
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_last_segment() {
        let client = Gemini::builder("test-key")
            .base_url("http://localhost:8080/v1beta")
            .model("gemini-1.5-flash")
            .build()
            .unwrap();
        let url = client.build_url("generateContent").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let err = Gemini::builder("test-key").base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }
}
