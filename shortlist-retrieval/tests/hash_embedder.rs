use shortlist_core::{EmbedMode, Embedding, IndexEntry, Metadata, VectorIndex};
use shortlist_retrieval::{FailurePolicy, HashEmbedder, InMemoryIndex, RetrievalService};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm(a) * norm(b))
}

#[tokio::test]
async fn hash_embedder_is_deterministic() {
    let embedder = HashEmbedder::new(4);
    let first = embedder.embed("hello", EmbedMode::Query).await.unwrap();
    let second = embedder.embed("hello", EmbedMode::Query).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn hash_embedder_batch_matches_single() {
    let embedder = HashEmbedder::new(4);
    let batch = embedder
        .embed_batch(&["hello".to_string()], EmbedMode::Document)
        .await
        .unwrap();
    let single = embedder.embed("hello", EmbedMode::Document).await.unwrap();
    assert_eq!(batch[0], single);
}

#[tokio::test]
async fn hash_embedder_matches_expected_vectors() {
    let embedder = HashEmbedder::new(4);
    let query = embedder.embed("hello", EmbedMode::Query).await.unwrap();
    let document = embedder.embed("hello", EmbedMode::Document).await.unwrap();

    let expected_query = [0.555125, 0.6422, 0.216075, 0.51915];
    let expected_document = [0.617775, 0.70485, 0.278725, 0.5818];
    for (value, expected) in query.iter().zip(expected_query) {
        assert!((value - expected).abs() < 1e-5);
    }
    for (value, expected) in document.iter().zip(expected_document) {
        assert!((value - expected).abs() < 1e-5);
    }
}

#[tokio::test]
async fn query_and_document_vectors_are_close_but_distinct() {
    let embedder = HashEmbedder::new(32);
    let query = embedder.embed("java developer", EmbedMode::Query).await.unwrap();
    let document = embedder
        .embed("java developer", EmbedMode::Document)
        .await
        .unwrap();

    assert_ne!(query, document);
    let score = cosine(&query, &document);
    assert!(score > 0.9 && score < 1.0, "score {score}");
}

#[tokio::test]
async fn service_embeds_queries_in_query_mode() {
    let embedder = HashEmbedder::new(16);
    let index = InMemoryIndex::new();

    // Stored under the query-mode vector, so only a query-mode lookup scores 1.0.
    let mut metadata = Metadata::new();
    metadata.insert("name".to_string(), serde_json::json!("Java 8"));
    index
        .upsert(vec![IndexEntry {
            id: "java-8".to_string(),
            vector: embedder.embed("java developer", EmbedMode::Query).await.unwrap(),
            metadata,
        }])
        .await
        .unwrap();

    let service =
        RetrievalService::new(embedder, index).with_failure_policy(FailurePolicy::Strict);
    let results = service.recommend("java developer", 1).await.unwrap();

    assert_eq!(results[0].name, "Java 8");
    assert!((results[0].score - 1.0).abs() < 1e-6, "score {}", results[0].score);
}
