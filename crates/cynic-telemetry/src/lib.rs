// Path: crates/cynic-telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! Observability for a CYNIC node: structured logging initialization, a
//! Prometheus `/metrics` endpoint, and sink traits that decouple
//! instrumentation call sites from the backend.

/// HTTP exposition of `/metrics`, `/healthz`, `/readyz`.
pub mod http;
/// Global structured-logging initialization.
pub mod init;
/// Concrete Prometheus-backed sink implementation.
pub mod prometheus_sink;
/// Abstract `*MetricsSink` traits.
pub mod sinks;
/// RAII scope timer recording duration metrics.
pub mod time;

pub use sinks::{chain_metrics, consensus_metrics, error_metrics, gossip_metrics, judgment_metrics};
