//! `embedContent` request and response types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::{Error, GeminiClient};
use crate::generation::Content;

/// Intended downstream use of an embedding; lets the API optimise the vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
    SemanticSimilarity,
    Classification,
    Clustering,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbeddingResponse {
    pub embedding: ContentEmbedding,
}

/// Builder for an `embedContent` call.
pub struct EmbedBuilder {
    client: Arc<GeminiClient>,
    text: String,
    task_type: Option<TaskType>,
}

impl EmbedBuilder {
    pub(crate) fn new(client: Arc<GeminiClient>) -> Self {
        Self { client, text: String::new(), task_type: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    fn into_request(self) -> (Arc<GeminiClient>, EmbedContentRequest) {
        let request = EmbedContentRequest {
            model: self.client.model.as_str().to_string(),
            content: Content::text(self.text),
            task_type: self.task_type,
        };
        (self.client, request)
    }

    pub async fn execute(self) -> Result<ContentEmbeddingResponse, Error> {
        let (client, request) = self.into_request();
        client.embed_content(request).await
    }
}
