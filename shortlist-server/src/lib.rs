//! HTTP surface and wiring for the `shortlist` binary.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/recommend` | `{"query": "...", "top_k": 3}` to `{"results": [...]}` |
//! | `GET`  | `/health` | Liveness check |
//!
//! `/recommend` always answers `200`. Unparseable bodies and upstream failures
//! produce `{"results": []}`.

pub mod bootstrap;
pub mod config;
pub mod logging;
mod routes;

pub use routes::{app, AppState, RecommendResponse, DEFAULT_MAX_TOP_K, MAX_BODY_BYTES};
