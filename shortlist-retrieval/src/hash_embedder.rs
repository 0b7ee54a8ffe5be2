use async_trait::async_trait;
use shortlist_core::{EmbedMode, Embedding, EmbeddingError};

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

const DOCUMENT_SEED: u64 = 0x646f63;
const QUERY_SEED: u64 = 0x717279;

/// Share of each component that depends on the text alone; the rest depends on the mode.
const SHARED_WEIGHT: f32 = 0.75;

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = FNV_OFFSET ^ seed;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn unit(hash: u64) -> f32 {
    (hash % 10_000) as f32 / 10_000.0
}

fn mode_seed(mode: EmbedMode) -> u64 {
    match mode {
        EmbedMode::Document => DOCUMENT_SEED,
        EmbedMode::Query => QUERY_SEED,
    }
}

/// Deterministic offline embedder for tests and local runs.
///
/// Like an asymmetric provider, a text embedded as a query lands close to, but not on,
/// the same text embedded as a document: cosine stays near 1.0 without reaching it.
#[derive(Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_to_vec(&self, text: &str, mode: EmbedMode) -> Vec<f32> {
        let bytes = text.as_bytes();
        let seed = mode_seed(mode);
        (0..self.dimension as u64)
            .map(|idx| {
                let shared = unit(fnv1a(bytes, idx));
                let skew = unit(fnv1a(bytes, seed ^ (idx << 32)));
                SHARED_WEIGHT * shared + (1.0 - SHARED_WEIGHT) * skew
            })
            .collect()
    }
}

#[async_trait]
impl Embedding for HashEmbedder {
    async fn embed(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.hash_to_vec(text, mode))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.hash_to_vec(text, mode)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
