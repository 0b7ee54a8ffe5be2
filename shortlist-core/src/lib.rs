//! Core types for the shortlist retrieval pipeline.
//!
//! - the catalog data model ([`CatalogItem`], [`IndexEntry`], [`Candidate`],
//!   [`Recommendation`]),
//! - provider seams ([`Embedding`], [`VectorIndex`]),
//! - the error taxonomy and retry policy shared by provider adapters,
//! - the [`AdaptiveRanker`].

mod candidate;
mod catalog;
mod embedding;
mod error;
pub mod ranker;
pub mod retry;
mod vector_index;

pub use candidate::{parse_flag, Candidate, Recommendation, DEFAULT_NAME, DEFAULT_URL};
pub use catalog::{CatalogItem, IndexEntry, Metadata};
pub use embedding::{EmbedMode, Embedding};
pub use error::{EmbeddingError, IndexError, RecommendError};
pub use ranker::{AdaptiveRanker, RankingConfig, TieBreak};
pub use retry::{RetryError, RetryPolicy, Retrying, Transient};
pub use vector_index::VectorIndex;
