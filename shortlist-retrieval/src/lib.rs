//! Retrieval pipeline for shortlist.
//!
//! [`RetrievalService`] ties an [`Embedding`](shortlist_core::Embedding) provider and a
//! [`VectorIndex`](shortlist_core::VectorIndex) to the adaptive ranker. The write side
//! ([`load_catalog`], [`Indexer`]) and the offline metrics in [`eval`] live here too.

mod catalog;
mod error;
pub mod eval;
mod hash_embedder;
mod in_memory;
mod indexer;
mod service;

pub use catalog::{load_catalog, parse_catalog};
pub use error::{RetrievalError, RetrievalResult};
pub use eval::{evaluate, EvalCase, EvalSummary};
pub use hash_embedder::HashEmbedder;
pub use in_memory::InMemoryIndex;
pub use indexer::{IndexReport, Indexer, DEFAULT_BATCH_SIZE};
pub use service::{
    FailurePolicy, Recommender, RetrievalService, DEFAULT_OVERFETCH_FACTOR, DEFAULT_TOP_K,
};
