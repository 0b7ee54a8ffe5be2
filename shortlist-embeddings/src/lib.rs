//! Embedding providers for shortlist.
//!
//! Providers implement [`shortlist_core::Embedding`] and report failures through
//! [`EmbeddingProviderError`], which maps onto the transient / permanent split the
//! core retry policy acts on. Wrap a provider in [`shortlist_core::Retrying`] to get
//! bounded exponential backoff.

mod error;

#[cfg(feature = "google")]
mod google;

pub use error::EmbeddingProviderError;

#[cfg(feature = "google")]
pub use google::{GoogleEmbedding, DEFAULT_DIMENSION, DEFAULT_MODEL, DEFAULT_TIMEOUT};
