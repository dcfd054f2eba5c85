use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use vokasi_rag::{ErrorKind, INDEX_FILE, RagError, VectorStore, open_index};

fn write_index(dir: &Path, manifest: serde_json::Value) {
    std::fs::write(dir.join(INDEX_FILE), serde_json::to_vec(&manifest).unwrap()).unwrap();
}

fn sample_manifest() -> serde_json::Value {
    json!({
        "collection": "handbook",
        "dimensions": 3,
        "embedding_model": "models/embedding-001",
        "chunks": [
            {"id": "c1", "text": "Classes start in September.", "embedding": [1.0, 0.0, 0.0],
             "metadata": {"source": "handbook.pdf", "page": "1"}},
            {"id": "c2", "text": "Exams are held in January.", "embedding": [0.0, 1.0, 0.0]}
        ]
    })
}

#[tokio::test]
async fn loads_a_valid_index() {
    let dir = TempDir::new().unwrap();
    write_index(dir.path(), sample_manifest());

    let index = open_index(dir.path()).await.unwrap();
    assert_eq!(index.collection, "handbook");
    assert_eq!(index.dimensions, 3);
    assert_eq!(index.chunk_count, 2);
    assert_eq!(index.embedding_model.as_deref(), Some("models/embedding-001"));
    assert_eq!(index.store.count("handbook").await.unwrap(), 2);

    let results = index.store.search("handbook", &[0.0, 1.0, 0.0], 1).await.unwrap();
    assert_eq!(results[0].chunk.id, "c2");
    assert!(results[0].chunk.metadata.is_empty());
}

#[tokio::test]
async fn dimensions_are_inferred_when_absent() {
    let dir = TempDir::new().unwrap();
    write_index(
        dir.path(),
        json!({"collection": "c", "chunks": [{"id": "x", "text": "t", "embedding": [0.5, 0.5]}]}),
    );

    let index = open_index(dir.path()).await.unwrap();
    assert_eq!(index.dimensions, 2);
    assert_eq!(index.embedding_model, None);
}

#[tokio::test]
async fn empty_index_loads() {
    let dir = TempDir::new().unwrap();
    write_index(dir.path(), json!({"collection": "empty", "chunks": []}));

    let index = open_index(dir.path()).await.unwrap();
    assert_eq!(index.chunk_count, 0);
    assert!(index.store.search("empty", &[1.0, 0.0], 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_directory_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let err = open_index(dir.path().join("index_db")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn missing_manifest_is_an_index_error() {
    let dir = TempDir::new().unwrap();
    let err = open_index(dir.path()).await.unwrap_err();
    assert!(matches!(err, RagError::Index { .. }));
}

#[tokio::test]
async fn malformed_manifest_is_an_index_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(INDEX_FILE), b"{ not json").unwrap();

    let err = open_index(dir.path()).await.unwrap_err();
    assert!(matches!(err, RagError::Index { ref message, .. } if message.contains("malformed")));
}

#[tokio::test]
async fn duplicate_chunk_ids_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_index(
        dir.path(),
        json!({"collection": "c", "chunks": [
            {"id": "dup", "text": "a", "embedding": [1.0]},
            {"id": "dup", "text": "b", "embedding": [0.5]}
        ]}),
    );

    let err = open_index(dir.path()).await.unwrap_err();
    assert!(err.to_string().contains("duplicate chunk id 'dup'"));
}

#[tokio::test]
async fn mixed_dimensions_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_index(
        dir.path(),
        json!({"collection": "c", "dimensions": 2, "chunks": [
            {"id": "a", "text": "a", "embedding": [1.0, 0.0]},
            {"id": "b", "text": "b", "embedding": [1.0, 0.0, 0.0]}
        ]}),
    );

    let err = open_index(dir.path()).await.unwrap_err();
    assert!(err.to_string().contains("expected 2"));
}

#[tokio::test]
async fn blank_collection_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_index(dir.path(), json!({"collection": "  ", "chunks": []}));
    assert!(open_index(dir.path()).await.is_err());
}

#[tokio::test]
async fn embedding_model_must_match_the_index() {
    let dir = TempDir::new().unwrap();
    write_index(dir.path(), sample_manifest());
    let index = open_index(dir.path()).await.unwrap();

    index.check_embedding_model("models/embedding-001").unwrap();
    index.check_embedding_model("embedding-001").unwrap();

    let err = index.check_embedding_model("models/text-embedding-004").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("text-embedding-004"));
}

#[tokio::test]
async fn index_without_model_accepts_any_embedding_model() {
    let dir = TempDir::new().unwrap();
    write_index(dir.path(), json!({"collection": "c", "chunks": []}));
    let index = open_index(dir.path()).await.unwrap();
    index.check_embedding_model("models/text-embedding-004").unwrap();
}
