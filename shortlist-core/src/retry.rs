use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{EmbedMode, Embedding, EmbeddingError, IndexError};

/// Errors that know whether another attempt could succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;

    /// Provider-supplied wait hint, e.g. from a `Retry-After` header.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Transient for EmbeddingError {
    fn is_transient(&self) -> bool {
        EmbeddingError::is_transient(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            EmbeddingError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl Transient for IndexError {
    fn is_transient(&self) -> bool {
        IndexError::is_transient(self)
    }
}

#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error not worth retrying.
    Permanent(E),
    /// Every attempt failed; `last` is the final cause.
    Exhausted { attempts: usize, last: E },
}

/// Bounded exponential backoff.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_for(&self, attempt: usize, hint: Option<Duration>) -> Duration {
        let computed = match hint {
            Some(hint) => hint,
            None => {
                let exponent = attempt.saturating_sub(1).min(31) as u32;
                self.base_delay.saturating_mul(1u32 << exponent)
            }
        };
        computed.min(self.max_delay)
    }

    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        E: Transient + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !error.is_transient() {
                        return Err(RetryError::Permanent(error));
                    }
                    if attempt >= max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }
                    let delay = self.delay_for(attempt, error.retry_after());
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient upstream failure, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Embedding client with input validation and retry on transient failures.
pub struct Retrying<E> {
    inner: E,
    policy: RetryPolicy,
}

impl<E> Retrying<E> {
    pub fn new(inner: E, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

fn embedding_failure(error: RetryError<EmbeddingError>) -> EmbeddingError {
    match error {
        RetryError::Permanent(error) => error,
        RetryError::Exhausted { attempts, last } => EmbeddingError::RetriesExhausted {
            attempts,
            last: Box::new(last),
        },
    }
}

#[async_trait]
impl<E> Embedding for Retrying<E>
where
    E: Embedding,
{
    async fn embed(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }

        self.policy
            .run(|| self.inner.embed(text, mode))
            .await
            .map_err(embedding_failure)
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "batch must not be empty".to_string(),
            ));
        }
        if let Some(position) = texts.iter().position(|text| text.trim().is_empty()) {
            return Err(EmbeddingError::InvalidInput(format!(
                "text at position {position} is empty"
            )));
        }

        self.policy
            .run(|| self.inner.embed_batch(texts, mode))
            .await
            .map_err(embedding_failure)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
