//! Command-line and environment configuration.
//!
//! Every setting can be given as a flag, before or after the subcommand, or
//! through the environment; a `.env` file in the working directory is loaded
//! before parsing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use shortlist_core::ranker::{ABSOLUTE_FLOOR, RELATIVE_MARGIN};
use shortlist_core::{RankingConfig, RetryPolicy, TieBreak};
use shortlist_embeddings::{DEFAULT_DIMENSION, DEFAULT_MODEL};
use shortlist_retrieval::{DEFAULT_BATCH_SIZE, DEFAULT_OVERFETCH_FACTOR, DEFAULT_TOP_K};

use crate::DEFAULT_MAX_TOP_K;

/// Assessment recommendations from free-text queries.
#[derive(Debug, Parser)]
#[command(name = "shortlist", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve,

    /// Run one query and print the results as JSON.
    Query {
        text: String,

        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Fail on provider errors instead of printing an empty list.
        #[arg(long)]
        strict: bool,
    },

    /// Embed a catalog CSV and upsert it into the index.
    Ingest {
        catalog: PathBuf,

        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Score the pipeline against labelled queries (JSON array of `{query, assessments}`).
    Eval {
        cases: PathBuf,

        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        k: usize,

        /// Also write the summary to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    #[arg(long, global = true, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    #[arg(long, global = true, env = "EMBEDDING_MODEL", default_value = DEFAULT_MODEL)]
    pub embedding_model: String,

    #[arg(long, global = true, env = "EMBEDDING_DIMENSION", default_value_t = DEFAULT_DIMENSION)]
    pub embedding_dimension: usize,

    #[arg(long, global = true, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: Option<String>,

    /// Data-plane host of the index, e.g. `https://assessments-abc123.svc.pinecone.io`.
    #[arg(long, global = true, env = "PINECONE_INDEX_HOST")]
    pub pinecone_index_host: Option<String>,

    #[arg(long, global = true, env = "PINECONE_NAMESPACE")]
    pub pinecone_namespace: Option<String>,

    /// Per-request timeout for embedding and index calls.
    #[arg(long, global = true, env = "UPSTREAM_TIMEOUT_MS", default_value_t = 5_000)]
    pub upstream_timeout_ms: u64,

    #[arg(long, global = true, env = "RETRY_BASE_DELAY_MS", default_value_t = 250)]
    pub retry_base_delay_ms: u64,

    #[arg(long, global = true, env = "RETRY_MAX_DELAY_MS", default_value_t = 4_000)]
    pub retry_max_delay_ms: u64,

    #[arg(long, global = true, env = "RETRY_MAX_ATTEMPTS", default_value_t = 3)]
    pub retry_max_attempts: usize,

    #[arg(long, global = true, env = "RANK_ABSOLUTE_FLOOR", default_value_t = ABSOLUTE_FLOOR)]
    pub rank_absolute_floor: f32,

    #[arg(long, global = true, env = "RANK_RELATIVE_MARGIN", default_value_t = RELATIVE_MARGIN)]
    pub rank_relative_margin: f32,

    /// `index-order` or `identifier`.
    #[arg(long, global = true, env = "RANK_TIE_BREAK", default_value = "index-order")]
    pub rank_tie_break: TieBreak,

    #[arg(
        long,
        global = true,
        env = "OVERFETCH_FACTOR",
        default_value_t = DEFAULT_OVERFETCH_FACTOR
    )]
    pub overfetch_factor: usize,

    #[arg(long, global = true, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: SocketAddr,

    #[arg(long, global = true, env = "MAX_TOP_K", default_value_t = DEFAULT_MAX_TOP_K)]
    pub max_top_k: usize,
}

impl Settings {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
            Duration::from_millis(self.retry_max_delay_ms),
        )
    }

    pub fn ranking(&self) -> RankingConfig {
        RankingConfig {
            absolute_floor: self.rank_absolute_floor,
            relative_margin: self.rank_relative_margin,
            tie_break: self.rank_tie_break,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    /// Parses `serve` with every defaulted setting passed as a flag, so values
    /// in the process environment cannot shadow the defaults.
    fn settings_from_defaults() -> Settings {
        let command = Cli::command();
        let mut argv = vec!["shortlist".to_string()];
        for arg in command.get_arguments() {
            let (Some(long), Some(default)) = (arg.get_long(), arg.get_default_values().first())
            else {
                continue;
            };
            argv.push(format!("--{long}"));
            argv.push(default.to_string_lossy().into_owned());
        }
        argv.push("serve".to_string());
        Cli::try_parse_from(argv).unwrap().settings
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = settings_from_defaults();
        assert_eq!(settings.embedding_dimension, 768);
        assert_eq!(settings.overfetch_factor, 3);
        assert_eq!(settings.max_top_k, 10);
        assert_eq!(settings.ranking(), RankingConfig::default());
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.upstream_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn subcommand_flags_parse() {
        let cli = Cli::try_parse_from([
            "shortlist",
            "--rank-tie-break",
            "identifier",
            "query",
            "java developer",
            "--top-k",
            "5",
            "--strict",
        ])
        .unwrap();
        assert_eq!(cli.settings.rank_tie_break, TieBreak::Identifier);
        match cli.command {
            Command::Query {
                text,
                top_k,
                strict,
            } => {
                assert_eq!(text, "java developer");
                assert_eq!(top_k, 5);
                assert!(strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn settings_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "shortlist",
            "query",
            "x",
            "--google-api-key",
            "k",
            "--max-top-k",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.settings.google_api_key.as_deref(), Some("k"));
        assert_eq!(cli.settings.max_top_k, 4);
        assert!(matches!(cli.command, Command::Query { text, .. } if text == "x"));
    }

    #[test]
    fn unknown_tie_break_is_rejected() {
        let result = Cli::try_parse_from(["shortlist", "--rank-tie-break", "random", "serve"]);
        assert!(result.is_err());
    }
}
