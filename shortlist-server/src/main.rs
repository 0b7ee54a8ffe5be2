use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use shortlist_retrieval::{evaluate, load_catalog, EvalCase, FailurePolicy, Indexer};
use shortlist_server::bootstrap::{build_embedder, build_index, build_service};
use shortlist_server::config::{Cli, Command, Settings};
use shortlist_server::logging::init_tracing;
use shortlist_server::{app, AppState, RecommendResponse};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Serve => serve(&cli.settings).await,
        Command::Query {
            text,
            top_k,
            strict,
        } => query(&cli.settings, &text, top_k, strict).await,
        Command::Ingest {
            catalog,
            batch_size,
        } => ingest(&cli.settings, &catalog, batch_size).await,
        Command::Eval { cases, k, output } => {
            eval(&cli.settings, &cases, k, output.as_deref()).await
        }
    }
}

async fn serve(settings: &Settings) -> Result<()> {
    let service = build_service(settings, FailurePolicy::Lenient).await?;
    let state = AppState::new(Arc::new(service)).with_max_top_k(settings.max_top_k);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn query(settings: &Settings, text: &str, top_k: usize, strict: bool) -> Result<()> {
    let policy = if strict {
        FailurePolicy::Strict
    } else {
        FailurePolicy::Lenient
    };
    let service = build_service(settings, policy).await?;
    let results = service.recommend(text, top_k).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&RecommendResponse { results })?
    );
    Ok(())
}

async fn ingest(settings: &Settings, catalog: &Path, batch_size: usize) -> Result<()> {
    let items = load_catalog(catalog)
        .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    let indexer = Indexer::new(build_embedder(settings)?, build_index(settings).await?)
        .with_batch_size(batch_size);

    let report = indexer.index(items).await?;
    println!("indexed {} item(s)", report.indexed);
    if !report.is_complete() {
        println!(
            "failed to embed {} item(s): {}",
            report.failed.len(),
            report.failed.join(", ")
        );
    }
    Ok(())
}

async fn eval(settings: &Settings, cases: &Path, k: usize, output: Option<&Path>) -> Result<()> {
    let raw = tokio::fs::read_to_string(cases)
        .await
        .with_context(|| format!("failed to read {}", cases.display()))?;
    let cases: Vec<EvalCase> =
        serde_json::from_str(&raw).context("evaluation cases must be a JSON array")?;

    let service = build_service(settings, FailurePolicy::Strict).await?;
    let summary = evaluate(&service, &cases, k).await;

    let rendered = serde_json::to_string_pretty(&summary)?;
    println!("{rendered}");
    if let Some(path) = output {
        tokio::fs::write(path, &rendered)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
