use std::time::Duration;

use shortlist_core::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<EmbeddingProviderError> for EmbeddingError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::InvalidResponse(message) => {
                EmbeddingError::InvalidResponse(message)
            }
            EmbeddingProviderError::Timeout(duration) => EmbeddingError::Timeout(duration),
            EmbeddingProviderError::Request(message) => EmbeddingError::Unavailable(message),
            EmbeddingProviderError::Status {
                status: 429,
                retry_after,
                ..
            } => EmbeddingError::RateLimited { retry_after },
            EmbeddingProviderError::Status {
                status, message, ..
            } if status >= 500 => EmbeddingError::Unavailable(format!("HTTP {status}: {message}")),
            EmbeddingProviderError::Status {
                status, message, ..
            } => EmbeddingError::Provider(format!("HTTP {status}: {message}")),
        }
    }
}
