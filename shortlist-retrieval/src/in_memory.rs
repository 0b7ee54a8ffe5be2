use std::collections::HashMap;
use std::sync::Arc;

use shortlist_core::ranker::by_score_desc;
use shortlist_core::{Candidate, IndexEntry, IndexError, VectorIndex};
use tokio::sync::RwLock;

#[derive(Default)]
struct IndexInner {
    entries: Vec<IndexEntry>,
    id_map: HashMap<String, usize>,
    dimension: Option<usize>,
}

/// Exact cosine-similarity index held in memory.
///
/// The first write fixes the dimension. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    inner: Arc<RwLock<IndexInner>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl VectorIndex for InMemoryIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Candidate>, IndexError> {
        if top_k == 0 {
            return Err(IndexError::InvalidTopK);
        }

        let inner = self.inner.read().await;
        let expected = inner.dimension.unwrap_or(vector.len());
        if expected != vector.len() {
            return Err(IndexError::DimensionMismatch {
                expected,
                got: vector.len(),
            });
        }

        let mut scored: Vec<Candidate> = inner
            .entries
            .iter()
            .map(|entry| Candidate {
                id: entry.id.clone(),
                score: cosine_similarity(vector, &entry.vector),
                metadata: entry.metadata.clone(),
            })
            .collect();

        // Stable, so equal scores stay in insertion order.
        scored.sort_by(|a, b| by_score_desc(a.score, b.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    /// All-or-nothing: a batch with any invalid entry leaves the index untouched.
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        let mut inner = self.inner.write().await;

        let expected = inner
            .dimension
            .or_else(|| entries.first().map(|entry| entry.vector.len()));
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(IndexError::InvalidId(entry.id.clone()));
            }
            if let Some(expected) = expected {
                if entry.vector.len() != expected {
                    return Err(IndexError::DimensionMismatch {
                        expected,
                        got: entry.vector.len(),
                    });
                }
            }
        }

        if inner.dimension.is_none() {
            inner.dimension = expected;
        }
        for entry in entries {
            if let Some(&index) = inner.id_map.get(&entry.id) {
                inner.entries[index] = entry;
            } else {
                let index = inner.entries.len();
                inner.id_map.insert(entry.id.clone(), index);
                inner.entries.push(entry);
            }
        }
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::cosine_similarity;

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let score = cosine_similarity(&[2.0, 0.0], &[5.0, 0.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }
}
