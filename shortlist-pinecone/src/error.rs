use std::time::Duration;

use shortlist_core::{IndexError, Transient};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PineconeIndexError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error(
        "pinecone api error {status}: {message} (retry_after={retry_after_seconds:?}, namespace={namespace:?}, batch_size={batch_size:?})"
    )]
    Api {
        status: u16,
        message: String,
        retry_after_seconds: Option<u64>,
        namespace: Option<String>,
        batch_size: Option<usize>,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("top_k must be greater than 0")]
    InvalidTopK,
    #[error("invalid entry id: {0:?}")]
    InvalidId(String),
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl Transient for PineconeIndexError {
    fn is_transient(&self) -> bool {
        match self {
            PineconeIndexError::Transport(_) | PineconeIndexError::Timeout(_) => true,
            PineconeIndexError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            PineconeIndexError::Api {
                retry_after_seconds: Some(seconds),
                ..
            } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}

impl From<PineconeIndexError> for IndexError {
    fn from(value: PineconeIndexError) -> Self {
        if value.is_transient() {
            return IndexError::Unavailable(value.to_string());
        }
        match value {
            PineconeIndexError::DimensionMismatch { expected, got } => {
                IndexError::DimensionMismatch { expected, got }
            }
            PineconeIndexError::InvalidTopK => IndexError::InvalidTopK,
            PineconeIndexError::InvalidId(id) => IndexError::InvalidId(id),
            other => IndexError::Internal(Box::new(other)),
        }
    }
}
