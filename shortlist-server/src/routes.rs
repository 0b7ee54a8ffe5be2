use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shortlist_core::Recommendation;
use shortlist_retrieval::{FailurePolicy, Recommender, DEFAULT_TOP_K};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const DEFAULT_MAX_TOP_K: usize = 10;
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    recommender: Arc<dyn Recommender>,
    max_top_k: usize,
}

impl AppState {
    pub fn new(recommender: Arc<dyn Recommender>) -> Self {
        Self {
            recommender,
            max_top_k: DEFAULT_MAX_TOP_K,
        }
    }

    pub fn with_max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = max_top_k.max(1);
        self
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub results: Vec<Recommendation>,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recommend", post(recommend))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

struct RecommendRequest {
    query: String,
    top_k: Option<usize>,
}

/// `None` when the body is not JSON or `query` is missing or not a string.
/// An unusable `top_k` falls back to the default instead.
fn parse_request(body: &[u8]) -> Option<RecommendRequest> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let query = value.get("query")?.as_str()?.to_string();
    let top_k = value
        .get("top_k")
        .and_then(Value::as_u64)
        .filter(|k| *k > 0)
        .map(|k| usize::try_from(k).unwrap_or(usize::MAX));
    Some(RecommendRequest { query, top_k })
}

/// Oversized or unreadable bodies are answered like malformed ones, with no results.
async fn recommend(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<RecommendResponse> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(
                status = %rejection.status(),
                "rejected recommend body, returning no results"
            );
            return Json(RecommendResponse::default());
        }
    };
    let Some(request) = parse_request(&body) else {
        tracing::debug!("unusable recommend body, returning no results");
        return Json(RecommendResponse::default());
    };

    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K).min(state.max_top_k);
    let results = match state
        .recommender
        .recommend_with_policy(&request.query, top_k, FailurePolicy::Lenient)
        .await
    {
        Ok(results) => results,
        Err(error) => {
            tracing::warn!(
                error = %error,
                transient = error.is_transient(),
                "recommendation failed, returning no results"
            );
            Vec::new()
        }
    };

    Json(RecommendResponse { results })
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
