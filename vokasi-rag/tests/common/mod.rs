//! Deterministic stand-ins for the hosted providers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vokasi_rag::{
    Chunk, CompletionProvider, EmbeddingProvider, InMemoryVectorStore, REFUSAL_PHRASE, RagConfig,
    RagError, RagPipeline, Result, VectorStore,
};

pub const COLLECTION: &str = "docs";

pub fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk { id: id.to_string(), text: text.to_string(), embedding, metadata: HashMap::new() }
}

/// Returns the same vector for every text.
pub struct FixedEmbedder(pub Vec<f32>);

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::Embedding { provider: "stub".into(), message: "quota exceeded".into() })
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Records every prompt and answers with a canned reply.
#[derive(Default)]
pub struct RecordingCompleter {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingCompleter {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for RecordingCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Follows the prompt's rule: refuses when the context block is empty,
/// otherwise answers with the first context line.
pub struct InstructionFollowingCompleter;

#[async_trait]
impl CompletionProvider for InstructionFollowingCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let context = prompt
            .split_once("Context:\n")
            .and_then(|(_, rest)| rest.split_once("\n\nQuestion:"))
            .map(|(context, _)| context)
            .unwrap_or_default();
        match context.lines().next() {
            Some(line) if !line.trim().is_empty() => Ok(line.to_string()),
            _ => Ok(REFUSAL_PHRASE.to_string()),
        }
    }

    fn name(&self) -> &str {
        "instruction-following"
    }
}

pub struct FailingCompleter;

#[async_trait]
impl CompletionProvider for FailingCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(RagError::Completion { provider: "stub".into(), message: "deadline exceeded".into() })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub async fn store_with(chunks: &[Chunk]) -> Arc<InMemoryVectorStore> {
    let store = Arc::new(InMemoryVectorStore::new());
    let dimensions = chunks.first().map(|c| c.embedding.len()).unwrap_or(0);
    store.create_collection(COLLECTION, dimensions).await.unwrap();
    store.upsert(COLLECTION, chunks).await.unwrap();
    store
}

/// Pipeline over `chunks` with a query embedding of `[1, 0]`.
pub async fn pipeline_with(
    chunks: &[Chunk],
    top_k: usize,
    completer: Arc<dyn CompletionProvider>,
) -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::builder().top_k(top_k).build().unwrap())
        .embedding_provider(Arc::new(FixedEmbedder(vec![1.0, 0.0])))
        .vector_store(store_with(chunks).await)
        .collection(COLLECTION)
        .completion_provider(completer)
        .build()
        .unwrap()
}

/// Five chunks whose cosine similarity to `[1, 0]` strictly decreases a → e.
pub fn ranked_chunks() -> Vec<Chunk> {
    vec![
        chunk("c", "Tuition is paid per semester.", vec![1.0, 1.0]),
        chunk("a", "The campus opens at 7 AM.", vec![1.0, 0.0]),
        chunk("e", "The cafeteria serves lunch.", vec![-1.0, 0.0]),
        chunk("b", "Registration closes on 1 August.", vec![1.0, 0.2]),
        chunk("d", "Parking is free for students.", vec![0.0, 1.0]),
    ]
}
