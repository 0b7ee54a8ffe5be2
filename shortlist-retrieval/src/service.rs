use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shortlist_core::{
    AdaptiveRanker, EmbedMode, Embedding, RankingConfig, RecommendError, Recommendation,
    VectorIndex,
};
use tracing::Instrument;

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_OVERFETCH_FACTOR: usize = 3;

/// What `recommend` does when the embedding provider or the index fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and answer with an empty list.
    #[default]
    Lenient,
    /// Return the provider error to the caller.
    Strict,
}

/// Query-in, recommendations-out.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend_with_policy(
        &self,
        query: &str,
        top_k: usize,
        policy: FailurePolicy,
    ) -> Result<Vec<Recommendation>, RecommendError>;
}

#[async_trait]
impl<T> Recommender for std::sync::Arc<T>
where
    T: Recommender + ?Sized,
{
    async fn recommend_with_policy(
        &self,
        query: &str,
        top_k: usize,
        policy: FailurePolicy,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        (**self).recommend_with_policy(query, top_k, policy).await
    }
}

/// Embeds the query, over-fetches from the index and ranks the result.
///
/// Retries live in the embedding and index clients; this layer calls each of
/// them at most once per request.
pub struct RetrievalService<E, I> {
    embedder: E,
    index: I,
    ranker: AdaptiveRanker,
    overfetch_factor: usize,
    policy: FailurePolicy,
}

impl<E, I> RetrievalService<E, I>
where
    E: Embedding,
    I: VectorIndex,
{
    pub fn new(embedder: E, index: I) -> Self {
        Self {
            embedder,
            index,
            ranker: AdaptiveRanker::default(),
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_ranking(mut self, config: RankingConfig) -> Self {
        self.ranker = AdaptiveRanker::new(config);
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_overfetch_factor(mut self, factor: usize) -> Self {
        self.overfetch_factor = factor.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn ranker(&self) -> &AdaptiveRanker {
        &self.ranker
    }

    pub fn overfetch_factor(&self) -> usize {
        self.overfetch_factor
    }

    /// Recommendations for `query` under the configured failure policy.
    pub async fn recommend(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        self.run(query, top_k, self.policy).await
    }

    async fn run(
        &self,
        query: &str,
        top_k: usize,
        policy: FailurePolicy,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let query = query.trim();
        if query.is_empty() || top_k == 0 {
            tracing::debug!(top_k, "empty query or top_k, skipping retrieval");
            return Ok(Vec::new());
        }

        let fetch_k = top_k.saturating_mul(self.overfetch_factor);
        let span = tracing::info_span!("recommend", top_k, fetch_k, ?policy);
        let outcome = self.fetch(query, top_k, fetch_k).instrument(span).await;

        match outcome {
            Ok(results) => Ok(results),
            Err(error) => match policy {
                FailurePolicy::Strict => Err(error),
                FailurePolicy::Lenient => {
                    tracing::warn!(error = %error, "retrieval failed, returning no results");
                    Ok(Vec::new())
                }
            },
        }
    }

    async fn fetch(
        &self,
        query: &str,
        top_k: usize,
        fetch_k: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let vector = self.embedder.embed(query, EmbedMode::Query).await?;
        let candidates = self.index.query(&vector, fetch_k).await?;
        Ok(self.ranker.rank(candidates, top_k))
    }
}

#[async_trait]
impl<E, I> Recommender for RetrievalService<E, I>
where
    E: Embedding,
    I: VectorIndex,
{
    async fn recommend_with_policy(
        &self,
        query: &str,
        top_k: usize,
        policy: FailurePolicy,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        self.run(query, top_k, policy).await
    }
}
