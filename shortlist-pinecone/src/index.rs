use serde_json::Value;
use shortlist_core::{
    Candidate, IndexEntry, IndexError, RetryError, RetryPolicy, VectorIndex,
};
use tracing::Instrument;

use crate::client::PineconeHttpClient;
use crate::config::PineconeIndexBuilder;
use crate::mapper::{entry_to_vector, match_to_candidate};
use crate::types::{
    IndexStatsResponse, PineconeVector, QueryRequest, QueryResponse, UpsertRequest,
};
use crate::PineconeIndexError;

pub struct PineconeIndex {
    pub(crate) client: PineconeHttpClient,
    pub(crate) namespace: Option<String>,
    pub(crate) dimension: Option<usize>,
    pub(crate) max_batch_size: usize,
    pub(crate) retry_policy: RetryPolicy,
}

impl PineconeIndex {
    pub fn builder() -> PineconeIndexBuilder {
        PineconeIndexBuilder::new()
    }

    pub(crate) fn new(
        client: PineconeHttpClient,
        namespace: Option<String>,
        dimension: Option<usize>,
        max_batch_size: usize,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            namespace,
            dimension,
            max_batch_size,
            retry_policy,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub(crate) async fn validate_dimension_on_init(&self) {
        let response = self
            .client
            .post_typed::<Value, IndexStatsResponse>(
                "/describe_index_stats",
                &Value::Object(serde_json::Map::new()),
            )
            .await;

        match response {
            Ok(stats) => match (stats.dimension, self.dimension) {
                (Some(index_dim), Some(expected)) if index_dim != expected => {
                    tracing::warn!(
                        namespace = ?self.namespace,
                        index_dim,
                        expected,
                        "configured dimension differs from pinecone index dimension"
                    );
                }
                (None, _) => {
                    tracing::warn!("pinecone describe_index_stats response missing 'dimension'");
                }
                _ => {}
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to validate pinecone index dimension");
            }
        }
    }

    fn check_dimension(&self, got: usize) -> Result<(), PineconeIndexError> {
        match self.dimension {
            Some(expected) if expected != got => {
                Err(PineconeIndexError::DimensionMismatch { expected, got })
            }
            _ => Ok(()),
        }
    }

    async fn with_retry<T, F, Fut>(&self, operation: F) -> Result<T, IndexError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PineconeIndexError>>,
    {
        self.retry_policy
            .run(operation)
            .await
            .map_err(|error| match error {
                RetryError::Permanent(error) => IndexError::from(error),
                RetryError::Exhausted { attempts, last } => IndexError::RetriesExhausted {
                    attempts,
                    last: Box::new(IndexError::from(last)),
                },
            })
    }

    async fn query_matches(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<Candidate>, IndexError> {
        if top_k == 0 {
            return Err(PineconeIndexError::InvalidTopK.into());
        }
        self.check_dimension(vector.len())?;

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response: QueryResponse = self
            .with_retry(|| {
                self.client.post_typed_with_context(
                    "/query",
                    &request,
                    self.namespace.as_deref(),
                    None,
                )
            })
            .await?;

        let mut output = Vec::with_capacity(response.matches.len());
        for m in response.matches {
            output.push(match_to_candidate(m)?);
        }
        tracing::debug!(matches = output.len(), "pinecone query returned");

        Ok(output)
    }

    /// Converts the whole batch before anything is sent.
    fn to_vectors(
        &self,
        entries: Vec<IndexEntry>,
    ) -> Result<Vec<PineconeVector>, PineconeIndexError> {
        let expected = self
            .dimension
            .or_else(|| entries.first().map(|entry| entry.vector.len()));

        let mut vectors = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.id.trim().is_empty() {
                return Err(PineconeIndexError::InvalidId(entry.id));
            }
            if let Some(expected) = expected {
                if entry.vector.len() != expected {
                    return Err(PineconeIndexError::DimensionMismatch {
                        expected,
                        got: entry.vector.len(),
                    });
                }
            }
            vectors.push(entry_to_vector(entry));
        }
        Ok(vectors)
    }

    async fn upsert_entries(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        let vectors = self.to_vectors(entries)?;

        let total_chunks = vectors.len().div_ceil(self.max_batch_size);
        for (chunk_index, chunk) in vectors.chunks(self.max_batch_size).enumerate() {
            let chunk_span = tracing::info_span!(
                "pinecone_upsert_chunk",
                namespace = ?self.namespace,
                chunk_index = chunk_index + 1,
                total_chunks = total_chunks,
                batch_size = chunk.len(),
            );

            let request = UpsertRequest {
                vectors: chunk,
                namespace: self.namespace.as_deref(),
            };

            let _: Value = self
                .with_retry(|| {
                    self.client.post_typed_with_context(
                        "/vectors/upsert",
                        &request,
                        self.namespace.as_deref(),
                        Some(chunk.len()),
                    )
                })
                .instrument(chunk_span)
                .await?;
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Candidate>, IndexError> {
        let span = tracing::info_span!(
            "pinecone_query",
            namespace = ?self.namespace,
            top_k = top_k,
        );
        self.query_matches(vector, top_k).instrument(span).await
    }

    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        let span = tracing::info_span!(
            "pinecone_upsert",
            namespace = ?self.namespace,
            batch_size = entries.len(),
        );
        self.upsert_entries(entries).instrument(span).await
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
