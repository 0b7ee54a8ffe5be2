//! Pinecone vector index client for shortlist.
//!
//! [`PineconeIndex`] implements [`shortlist_core::VectorIndex`] over the Pinecone
//! data-plane REST API:
//! - `query` requests metadata alongside scores so no secondary lookup is needed,
//! - `upsert` writes entries in chunks of `max_batch_size`, overwriting by id,
//! - transient failures (timeouts, 429, 5xx) are retried with the configured
//!   [`shortlist_core::RetryPolicy`].
//!
//! Environment variables commonly used:
//! - `PINECONE_API_KEY`
//! - `PINECONE_INDEX_HOST`
//! - `PINECONE_NAMESPACE` (optional)

pub mod client;
mod config;
mod error;
mod index;
pub mod mapper;
pub mod types;

pub use config::{PineconeIndexBuilder, DEFAULT_MAX_BATCH_SIZE, DEFAULT_TIMEOUT};
pub use error::PineconeIndexError;
pub use index::PineconeIndex;
