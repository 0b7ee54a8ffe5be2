use async_trait::async_trait;

use crate::{Candidate, IndexEntry, IndexError};

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest neighbours of `vector`, best match first.
    ///
    /// An empty index yields an empty vec. `top_k == 0` is rejected.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Candidate>, IndexError>;

    /// Writes entries, replacing any existing entry with the same id.
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError>;

    /// Vector dimension the index was configured with, when known.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
impl<T> VectorIndex for std::sync::Arc<T>
where
    T: VectorIndex + ?Sized,
{
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Candidate>, IndexError> {
        (**self).query(vector, top_k).await
    }

    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        (**self).upsert(entries).await
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }
}
