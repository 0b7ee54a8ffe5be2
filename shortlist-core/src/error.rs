use std::{error::Error as StdError, fmt, time::Duration};

use thiserror::Error;

#[derive(Debug)]
pub enum EmbeddingError {
    InvalidInput(String),
    InvalidResponse(String),
    RateLimited { retry_after: Option<Duration> },
    Timeout(Duration),
    Unavailable(String),
    Provider(String),
    RetriesExhausted {
        attempts: usize,
        last: Box<EmbeddingError>,
    },
    Other(Box<dyn StdError + Send + Sync>),
}

impl EmbeddingError {
    /// Rate limits, timeouts and unreachable providers are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EmbeddingError::RateLimited { .. }
                | EmbeddingError::Timeout(_)
                | EmbeddingError::Unavailable(_)
        )
    }
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingError::InvalidInput(message) => {
                write!(f, "Embedding invalid input: {message}")
            }
            EmbeddingError::InvalidResponse(message) => {
                write!(f, "Embedding invalid response: {message}")
            }
            EmbeddingError::RateLimited { retry_after } => match retry_after {
                Some(duration) => write!(f, "Embedding rate limited (retry_after={duration:?})"),
                None => write!(f, "Embedding rate limited (retry_after=unknown)"),
            },
            EmbeddingError::Timeout(duration) => write!(f, "Embedding timeout after {duration:?}"),
            EmbeddingError::Unavailable(message) => {
                write!(f, "Embedding provider unavailable: {message}")
            }
            EmbeddingError::Provider(message) => write!(f, "Embedding provider error: {message}"),
            EmbeddingError::RetriesExhausted { attempts, last } => {
                write!(f, "Embedding failed after {attempts} attempt(s): {last}")
            }
            EmbeddingError::Other(error) => write!(f, "Embedding error: {error}"),
        }
    }
}

impl StdError for EmbeddingError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EmbeddingError::RetriesExhausted { last, .. } => Some(last.as_ref()),
            EmbeddingError::Other(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("top_k must be greater than 0")]
    InvalidTopK,
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid entry id: {0:?}")]
    InvalidId(String),
    #[error("Index unavailable: {0}")]
    Unavailable(String),
    #[error("Index failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        last: Box<IndexError>,
    },
    #[error("Index error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}

impl IndexError {
    pub fn is_transient(&self) -> bool {
        matches!(self, IndexError::Unavailable(_))
    }
}

/// Failures visible to callers of the retrieval pipeline.
///
/// Only surfaces when the caller opted into strict failure handling.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("embedding provider failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("vector index failed: {0}")]
    Index(#[from] IndexError),
}

impl RecommendError {
    /// Whether the underlying provider failure may succeed on a later call.
    pub fn is_transient(&self) -> bool {
        match self {
            RecommendError::Embedding(err) => err.is_transient(),
            RecommendError::Index(err) => err.is_transient(),
        }
    }
}
