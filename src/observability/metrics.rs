//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sink_connect_attempts_total` (counter): factory calls by endpoint
//! - `sink_connected` (gauge): 1 while a connection is live
//! - `sink_failovers_total` (counter): successful reconnects after a write failure
//! - `sink_recovery_sweeps_total` (counter): backoff sweeps
//! - `sink_exhausted_total` (counter): recoveries that gave up
//! - `sink_records_total` (counter): appended records by outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::endpoint::Endpoint;

/// Install the Prometheus exporter on `addr`. Needs a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_connect_attempt(endpoint: &Endpoint) {
    metrics::counter!("sink_connect_attempts_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_connected(connected: bool) {
    metrics::gauge!("sink_connected").set(if connected { 1.0 } else { 0.0 });
}

pub fn record_failover() {
    metrics::counter!("sink_failovers_total").increment(1);
}

pub fn record_recovery_sweep() {
    metrics::counter!("sink_recovery_sweeps_total").increment(1);
}

pub fn record_exhausted() {
    metrics::counter!("sink_exhausted_total").increment(1);
}

pub fn record_append(outcome: &'static str) {
    metrics::counter!("sink_records_total", "outcome" => outcome).increment(1);
}
