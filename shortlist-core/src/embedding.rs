use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::EmbeddingError;

/// Which side of an asymmetric embedding a text sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedMode {
    /// Catalog records embedded at ingestion time.
    Document,
    /// Free-text queries embedded at search time.
    Query,
}

#[async_trait]
pub trait Embedding: Send + Sync {
    async fn embed(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimension(&self) -> usize;
}

#[async_trait]
impl<T> Embedding for std::sync::Arc<T>
where
    T: Embedding + ?Sized,
{
    async fn embed(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text, mode).await
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts, mode).await
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}
