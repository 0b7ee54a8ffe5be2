use std::time::Duration;

use shortlist_core::RetryPolicy;

use crate::client::PineconeHttpClient;
use crate::index::PineconeIndex;
use crate::PineconeIndexError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

pub struct PineconeIndexBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    namespace: Option<String>,
    dimension: Option<usize>,
    validate_dimension: bool,
    max_batch_size: usize,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl Default for PineconeIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PineconeIndexBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            namespace: None,
            dimension: None,
            validate_dimension: false,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Index host, e.g. `https://assessments-abc123.svc.us-east-1.pinecone.io`.
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn namespace(mut self, value: impl Into<String>) -> Self {
        self.namespace = Some(value.into());
        self
    }

    /// Expected vector dimension; enforced on upsert and on query.
    pub fn dimension(mut self, value: usize) -> Self {
        self.dimension = Some(value);
        self
    }

    pub fn validate_dimension(mut self, value: bool) -> Self {
        self.validate_dimension = value;
        self
    }

    pub fn max_batch_size(mut self, value: usize) -> Self {
        self.max_batch_size = value;
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn retry_policy(mut self, value: RetryPolicy) -> Self {
        self.retry_policy = value;
        self
    }

    pub fn base_url_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.base_url = Some(value);
        }
        self
    }

    pub fn api_key_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.api_key = Some(value);
        }
        self
    }

    pub async fn build(self) -> Result<PineconeIndex, PineconeIndexError> {
        let base_url = self
            .base_url
            .ok_or_else(|| PineconeIndexError::Config("base_url is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| PineconeIndexError::Config("api_key is required".to_string()))?;

        let client = PineconeHttpClient::new(base_url, api_key, self.timeout)?;
        if self.max_batch_size == 0 {
            return Err(PineconeIndexError::Config(
                "max_batch_size must be greater than 0".to_string(),
            ));
        }
        if self.dimension == Some(0) {
            return Err(PineconeIndexError::Config(
                "dimension must be greater than 0".to_string(),
            ));
        }

        let index = PineconeIndex::new(
            client,
            self.namespace,
            self.dimension,
            self.max_batch_size,
            self.retry_policy,
        );
        if self.validate_dimension {
            index.validate_dimension_on_init().await;
        }
        Ok(index)
    }
}
