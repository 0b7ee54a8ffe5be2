use std::collections::HashSet;

use shortlist_core::{CatalogItem, EmbedMode, Embedding, IndexEntry, VectorIndex};

use crate::{RetrievalError, RetrievalResult};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Outcome of one ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    /// Ids whose embedding batch failed and were not written.
    pub failed: Vec<String>,
}

impl IndexReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Embeds catalog items in document mode and writes them to the index.
pub struct Indexer<E, I> {
    embedder: E,
    index: I,
    batch_size: usize,
}

impl<E, I> Indexer<E, I>
where
    E: Embedding,
    I: VectorIndex,
{
    pub fn new(embedder: E, index: I) -> Self {
        Self {
            embedder,
            index,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ids must be non-empty and unique within `items`.
    /// A batch that fails to embed is skipped and reported; an index write failure aborts.
    pub async fn index(&self, items: Vec<CatalogItem>) -> RetrievalResult<IndexReport> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(RetrievalError::InvalidId(item.id.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(RetrievalError::DuplicateId(item.id.clone()));
            }
        }

        let mut report = IndexReport::default();
        let total_batches = items.len().div_ceil(self.batch_size);
        for (batch_index, batch) in items.chunks(self.batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(CatalogItem::document_text).collect();
            let vectors = match self.embedder.embed_batch(&texts, EmbedMode::Document).await {
                Ok(vectors) if vectors.len() == batch.len() => vectors,
                Ok(vectors) => {
                    tracing::warn!(
                        batch = batch_index + 1,
                        expected = batch.len(),
                        got = vectors.len(),
                        "embedding batch size mismatch, skipping batch"
                    );
                    report.failed.extend(batch.iter().map(|item| item.id.clone()));
                    continue;
                }
                Err(error) => {
                    tracing::warn!(
                        batch = batch_index + 1,
                        total_batches,
                        error = %error,
                        "embedding batch failed, skipping batch"
                    );
                    report.failed.extend(batch.iter().map(|item| item.id.clone()));
                    continue;
                }
            };

            let entries: Vec<IndexEntry> = batch
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(item, vector)| item.into_entry(vector))
                .collect();
            self.index.upsert(entries).await?;
            report.indexed += batch.len();
            tracing::debug!(batch = batch_index + 1, total_batches, "indexed batch");
        }

        tracing::info!(
            indexed = report.indexed,
            failed = report.failed.len(),
            "catalog ingestion finished"
        );
        Ok(report)
    }
}
