//! Tracing initialization for the binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "SHORTLIST_LOG";
pub const DEFAULT_FILTER: &str = "shortlist=info,tower_http=info";

/// Installs the global subscriber. Safe to call more than once.
///
/// Directives come from `SHORTLIST_LOG` (e.g. `shortlist_retrieval=debug,tower_http=warn`),
/// falling back to `shortlist=info,tower_http=info` when unset or invalid. Output goes
/// to stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let result = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init();
        if let Err(err) = result {
            eprintln!("tracing already initialised: {err}");
        }
    });
}
