use std::time::Duration;

use crate::EmbeddingProviderError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use shortlist_core::{EmbedMode, Embedding, EmbeddingError};
use tracing::Instrument;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub const DEFAULT_MODEL: &str = "text-embedding-004";
pub const DEFAULT_DIMENSION: usize = 768;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct GoogleEmbedding {
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
    timeout: Duration,
    http: Client,
}

impl GoogleEmbedding {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimension,
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Upper bound for a single HTTP exchange, retries excluded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn model_name(&self) -> &str {
        self.model
            .strip_prefix("models/")
            .unwrap_or(self.model.as_str())
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent",
            self.base_url.trim_end_matches('/'),
            self.model_name()
        )
    }

    fn batch_embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.base_url.trim_end_matches('/'),
            self.model_name()
        )
    }

    fn content_request(&self, text: &str, mode: EmbedMode) -> EmbedContentRequest {
        EmbedContentRequest {
            model: Some(format!("models/{}", self.model_name())),
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
            task_type: task_type(mode),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, EmbeddingProviderError> {
        let response = request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GoogleErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body_or_reason(status, body));

        Err(EmbeddingProviderError::Status {
            status: status.as_u16(),
            message,
            retry_after,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> EmbeddingProviderError {
        if err.is_timeout() {
            EmbeddingProviderError::Timeout(self.timeout)
        } else {
            EmbeddingProviderError::Request(err.without_url().to_string())
        }
    }

    /// Body read failures: a stalled body is a timeout, anything else a bad payload.
    fn decode_error(&self, err: reqwest::Error) -> EmbeddingProviderError {
        if err.is_timeout() {
            EmbeddingProviderError::Timeout(self.timeout)
        } else {
            EmbeddingProviderError::InvalidResponse(err.without_url().to_string())
        }
    }

    fn check_dimension(&self, values: &[f32]) -> Result<(), EmbeddingProviderError> {
        if values.len() != self.dimension {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                values.len()
            )));
        }
        Ok(())
    }
}

fn task_type(mode: EmbedMode) -> &'static str {
    match mode {
        EmbedMode::Document => "RETRIEVAL_DOCUMENT",
        EmbedMode::Query => "RETRIEVAL_QUERY",
    }
}

fn body_or_reason(status: StatusCode, body: String) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    content: Content,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedContentsRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedContentsResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(alias = "value")]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

impl GoogleEmbedding {
    async fn embed_one(
        &self,
        text: &str,
        mode: EmbedMode,
    ) -> Result<Vec<f32>, EmbeddingProviderError> {
        let request = self.content_request(text, mode);
        let response = self
            .send(self.http.post(self.embed_url()).json(&request))
            .await?
            .json::<EmbedContentResponse>()
            .await
            .map_err(|err| self.decode_error(err))?;

        self.check_dimension(&response.embedding.values)?;
        Ok(response.embedding.values)
    }

    async fn embed_many(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let request = BatchEmbedContentsRequest {
            requests: texts
                .iter()
                .map(|text| self.content_request(text, mode))
                .collect(),
        };

        let response = self
            .send(self.http.post(self.batch_embed_url()).json(&request))
            .await?
            .json::<BatchEmbedContentsResponse>()
            .await
            .map_err(|err| self.decode_error(err))?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        let mut output = Vec::with_capacity(response.embeddings.len());
        for embedding in response.embeddings {
            self.check_dimension(&embedding.values)?;
            output.push(embedding.values);
        }

        Ok(output)
    }
}

#[async_trait]
impl Embedding for GoogleEmbedding {
    async fn embed(&self, text: &str, mode: EmbedMode) -> Result<Vec<f32>, EmbeddingError> {
        let span = tracing::debug_span!("google_embed", model = %self.model_name(), ?mode);
        Ok(self.embed_one(text, mode).instrument(span).await?)
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let span = tracing::debug_span!(
            "google_embed_batch",
            model = %self.model_name(),
            ?mode,
            batch_size = texts.len(),
        );
        Ok(self.embed_many(texts, mode).instrument(span).await?)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
