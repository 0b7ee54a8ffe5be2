//! Builds provider clients and the retrieval service from [`Settings`].

use anyhow::{Context, Result};
use shortlist_core::Retrying;
use shortlist_embeddings::GoogleEmbedding;
use shortlist_pinecone::PineconeIndex;
use shortlist_retrieval::{FailurePolicy, RetrievalService};

use crate::config::Settings;

pub type Embedder = Retrying<GoogleEmbedding>;
pub type Service = RetrievalService<Embedder, PineconeIndex>;

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .with_context(|| format!("{name} is not set"))
}

pub fn build_embedder(settings: &Settings) -> Result<Embedder> {
    let api_key = required(&settings.google_api_key, "GOOGLE_API_KEY")?;
    let google = GoogleEmbedding::new(
        api_key,
        settings.embedding_model.clone(),
        settings.embedding_dimension,
    )
    .with_timeout(settings.upstream_timeout());
    Ok(Retrying::new(google, settings.retry_policy()))
}

pub async fn build_index(settings: &Settings) -> Result<PineconeIndex> {
    let host = required(&settings.pinecone_index_host, "PINECONE_INDEX_HOST")?;
    let api_key = required(&settings.pinecone_api_key, "PINECONE_API_KEY")?;

    let mut builder = PineconeIndex::builder()
        .base_url(host)
        .api_key(api_key)
        .dimension(settings.embedding_dimension)
        .validate_dimension(true)
        .timeout(settings.upstream_timeout())
        .retry_policy(settings.retry_policy());
    if let Some(namespace) = settings
        .pinecone_namespace
        .as_deref()
        .filter(|namespace| !namespace.trim().is_empty())
    {
        builder = builder.namespace(namespace);
    }

    builder
        .build()
        .await
        .context("failed to configure pinecone index")
}

pub async fn build_service(settings: &Settings, policy: FailurePolicy) -> Result<Service> {
    let embedder = build_embedder(settings)?;
    let index = build_index(settings).await?;
    Ok(RetrievalService::new(embedder, index)
        .with_ranking(settings.ranking())
        .with_overfetch_factor(settings.overfetch_factor)
        .with_failure_policy(policy))
}
