use std::{error::Error, time::Duration};

use shortlist_core::{EmbeddingError, IndexError, RecommendError};

#[test]
fn embedding_error_display_for_rate_limited() {
    let err = EmbeddingError::RateLimited {
        retry_after: Some(Duration::from_secs(2)),
    };
    assert_eq!(format!("{err}"), "Embedding rate limited (retry_after=2s)");
}

#[test]
fn embedding_error_display_for_timeout() {
    let err = EmbeddingError::Timeout(Duration::from_millis(750));
    assert_eq!(format!("{err}"), "Embedding timeout after 750ms");
}

#[test]
fn embedding_error_display_for_other() {
    let err = EmbeddingError::Other("network".to_string().into());
    assert_eq!(format!("{err}"), "Embedding error: network");
    assert!(err.source().is_some());
}

#[test]
fn retries_exhausted_exposes_last_cause_as_source() {
    let err = EmbeddingError::RetriesExhausted {
        attempts: 3,
        last: Box::new(EmbeddingError::Unavailable("503".to_string())),
    };
    assert_eq!(
        format!("{err}"),
        "Embedding failed after 3 attempt(s): Embedding provider unavailable: 503"
    );
    assert!(err.source().is_some());
}

#[test]
fn transient_classification() {
    assert!(EmbeddingError::Timeout(Duration::from_secs(1)).is_transient());
    assert!(EmbeddingError::Unavailable("reset".to_string()).is_transient());
    assert!(!EmbeddingError::InvalidInput("empty".to_string()).is_transient());
    assert!(!EmbeddingError::Provider("forbidden".to_string()).is_transient());
    assert!(IndexError::Unavailable("502".to_string()).is_transient());
    assert!(!IndexError::InvalidTopK.is_transient());
}

#[test]
fn recommend_error_wraps_provider_failures() {
    let err: RecommendError = EmbeddingError::Provider("quota".to_string()).into();
    assert!(!err.is_transient());
    assert_eq!(
        format!("{err}"),
        "embedding provider failed: Embedding provider error: quota"
    );

    let err: RecommendError = IndexError::InvalidTopK.into();
    assert!(!err.is_transient());

    let err: RecommendError = IndexError::Unavailable("reset".to_string()).into();
    assert!(err.is_transient());
}
