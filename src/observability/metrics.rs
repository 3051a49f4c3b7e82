//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ballot_submissions_total` (counter): submissions by intent, outcome
//! - `ballot_nonce_fetches_total` (counter): nonce reads by outcome
//! - `ballot_rpc_errors_total` (counter): failed RPC calls by method
//! - `ballot_sync_batch_size` (histogram): records processed per batch
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(intent: &'static str, outcome: &'static str) {
    ::metrics::counter!("ballot_submissions_total", "intent" => intent, "outcome" => outcome)
        .increment(1);
}

pub fn record_nonce_fetch(ok: bool) {
    let outcome = if ok { "success" } else { "failure" };
    ::metrics::counter!("ballot_nonce_fetches_total", "outcome" => outcome).increment(1);
}

pub fn record_rpc_error(method: &'static str) {
    ::metrics::counter!("ballot_rpc_errors_total", "method" => method).increment(1);
}

pub fn record_batch_size(kind: &'static str, size: usize) {
    ::metrics::histogram!("ballot_sync_batch_size", "kind" => kind).record(size as f64);
}
