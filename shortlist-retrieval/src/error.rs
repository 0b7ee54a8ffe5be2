use shortlist_core::{EmbeddingError, IndexError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid catalog id: {0:?}")]
    InvalidId(String),
    #[error("duplicate catalog id: {0:?}")]
    DuplicateId(String),
    #[error("catalog row {row}: {message}")]
    Catalog { row: usize, message: String },
    #[error("catalog read failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
