use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use shortlist_core::{
    Candidate, EmbedMode, Embedding, EmbeddingError, IndexEntry, IndexError, Metadata,
    RankingConfig, RecommendError, TieBreak, VectorIndex,
};
use shortlist_retrieval::{FailurePolicy, Recommender, RetrievalService};

#[derive(Default)]
struct CountingEmbedder {
    calls: AtomicUsize,
    modes: Mutex<Vec<EmbedMode>>,
    fail: bool,
}

impl CountingEmbedder {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Embedding for CountingEmbedder {
    async fn embed(&self, _text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().unwrap().push(mode);
        if self.fail {
            return Err(EmbeddingError::RetriesExhausted {
                attempts: 3,
                last: Box::new(EmbeddingError::Unavailable("HTTP 503".to_string())),
            });
        }
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text, mode).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        2
    }
}

#[derive(Default)]
struct FixedIndex {
    candidates: Vec<Candidate>,
    requested: Mutex<Vec<usize>>,
    fail: bool,
}

impl FixedIndex {
    fn with(scores: &[(&str, f32)]) -> Self {
        let candidates = scores
            .iter()
            .map(|(id, score)| {
                let mut metadata = Metadata::new();
                metadata.insert("name".to_string(), json!(format!("Assessment {id}")));
                metadata.insert("url".to_string(), json!(format!("https://example.test/{id}")));
                metadata.insert("type".to_string(), json!("K"));
                Candidate::new(*id, *score).with_metadata(metadata)
            })
            .collect();
        Self {
            candidates,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl VectorIndex for FixedIndex {
    async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<Candidate>, IndexError> {
        self.requested.lock().unwrap().push(top_k);
        if self.fail {
            return Err(IndexError::Unavailable("connection refused".to_string()));
        }
        Ok(self.candidates.iter().take(top_k).cloned().collect())
    }

    async fn upsert(&self, _entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        Ok(())
    }
}

fn four_candidates() -> FixedIndex {
    FixedIndex::with(&[("A", 0.91), ("B", 0.85), ("C", 0.60), ("D", 0.40)])
}

#[tokio::test]
async fn recommend_applies_adaptive_threshold() {
    let service = RetrievalService::new(CountingEmbedder::default(), four_candidates());

    let results = service.recommend("java developer", 3).await.unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Assessment A", "Assessment B"]);
    assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[tokio::test]
async fn recommend_overfetches_and_embeds_in_query_mode() {
    let embedder = Arc::new(CountingEmbedder::default());
    let index = Arc::new(four_candidates());
    let service = RetrievalService::new(embedder.clone(), index.clone());

    service.recommend("sales graduate", 2).await.unwrap();

    assert_eq!(*index.requested.lock().unwrap(), vec![6]);
    assert_eq!(*embedder.modes.lock().unwrap(), vec![EmbedMode::Query]);
}

#[tokio::test]
async fn overfetch_factor_is_configurable() {
    let index = Arc::new(four_candidates());
    let service = RetrievalService::new(CountingEmbedder::default(), index.clone())
        .with_overfetch_factor(5);

    service.recommend("sales graduate", 2).await.unwrap();

    assert_eq!(*index.requested.lock().unwrap(), vec![10]);
}

#[tokio::test]
async fn blank_query_makes_no_network_calls() {
    let embedder = Arc::new(CountingEmbedder::default());
    let index = Arc::new(four_candidates());
    let service = RetrievalService::new(embedder.clone(), index.clone())
        .with_failure_policy(FailurePolicy::Strict);

    assert!(service.recommend("   \n\t", 3).await.unwrap().is_empty());
    assert!(service.recommend("java", 0).await.unwrap().is_empty());

    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert!(index.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn low_scores_yield_empty_result() {
    let service = RetrievalService::new(
        CountingEmbedder::default(),
        FixedIndex::with(&[("A", 0.3), ("B", 0.2)]),
    );

    assert!(service.recommend("content writer", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_index_yields_empty_result() {
    let service = RetrievalService::new(CountingEmbedder::default(), FixedIndex::default());

    assert!(service.recommend("anything", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn embedding_failure_is_empty_when_lenient() {
    let index = Arc::new(four_candidates());
    let service = RetrievalService::new(CountingEmbedder::failing(), index.clone());

    let results = service.recommend("java developer", 3).await.unwrap();

    assert!(results.is_empty());
    assert!(index.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn embedding_failure_surfaces_when_strict() {
    let service = RetrievalService::new(CountingEmbedder::failing(), four_candidates())
        .with_failure_policy(FailurePolicy::Strict);

    let err = service.recommend("java developer", 3).await.unwrap_err();

    assert!(matches!(err, RecommendError::Embedding(_)));
    assert!(!err.is_transient());
    assert!(err.to_string().contains("3 attempt(s)"));
}

#[tokio::test]
async fn index_failure_follows_policy() {
    let lenient = RetrievalService::new(CountingEmbedder::default(), FixedIndex::failing());
    assert!(lenient.recommend("java", 3).await.unwrap().is_empty());

    let strict = RetrievalService::new(CountingEmbedder::default(), FixedIndex::failing());
    let err = strict
        .recommend_with_policy("java", 3, FailurePolicy::Strict)
        .await
        .unwrap_err();
    assert!(matches!(err, RecommendError::Index(IndexError::Unavailable(_))));
}

#[tokio::test]
async fn repeated_queries_return_identical_results() {
    let service = RetrievalService::new(
        CountingEmbedder::default(),
        FixedIndex::with(&[("A", 0.9), ("B", 0.8), ("C", 0.8), ("D", 0.75)]),
    );

    let first = service.recommend("agile", 3).await.unwrap();
    let second = service.recommend("agile", 3).await.unwrap();

    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Assessment A", "Assessment B", "Assessment C"]);
}

#[tokio::test]
async fn ranking_config_is_applied() {
    let config = RankingConfig {
        absolute_floor: 0.3,
        relative_margin: 0.6,
        tie_break: TieBreak::Identifier,
    };
    let service = RetrievalService::new(CountingEmbedder::default(), four_candidates())
        .with_ranking(config.clone());

    let results = service.recommend("java", 10).await.unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(service.ranker().config(), &config);
}

#[tokio::test]
async fn service_is_usable_as_shared_recommender() {
    let service: Arc<dyn Recommender> = Arc::new(RetrievalService::new(
        CountingEmbedder::default(),
        four_candidates(),
    ));

    let results = service
        .recommend_with_policy("java", 1, FailurePolicy::Lenient)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].test_type, "K");
}
