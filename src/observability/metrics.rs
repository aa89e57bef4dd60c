//! Metrics collection and exposition.
//!
//! # Metrics
//! - `liveness_probes_total` (counter): probe results by server, outcome
//! - `liveness_cycles_total` (counter): probe cycles dispatched
//! - `liveness_cycle_probes` (gauge): probes dispatched by the last cycle
//! - `liveness_servers_online` (gauge): online servers at last status query
//! - `liveness_servers_total` (gauge): counted servers at last status query
//! - `liveness_store_entries` (gauge): servers that ever succeeded
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::status::ServerCounts;

/// Outcome label for a finished probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    Failure,
    Timeout,
}

impl ProbeOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbeOutcome::Success => "success",
            ProbeOutcome::Failure => "failure",
            ProbeOutcome::Timeout => "timeout",
        }
    }
}

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(server: &str, outcome: ProbeOutcome) {
    metrics::counter!(
        "liveness_probes_total",
        "server" => server.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_cycle(dispatched: usize) {
    metrics::counter!("liveness_cycles_total").increment(1);
    metrics::gauge!("liveness_cycle_probes").set(dispatched as f64);
}

pub fn record_server_counts(counts: ServerCounts) {
    metrics::gauge!("liveness_servers_online").set(counts.online as f64);
    metrics::gauge!("liveness_servers_total").set(counts.total as f64);
}

pub fn record_store_size(entries: usize) {
    metrics::gauge!("liveness_store_entries").set(entries as f64);
}
