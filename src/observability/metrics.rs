//! Metrics collection and exposition.
//!
//! # Metrics
//! - `adapter_responses_total` (counter): adapted results by outcome
//! - `gateway_requests_total` (counter): gateway requests by route, status
//! - `gateway_request_duration_seconds` (histogram): gateway latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one adapted result.
pub fn record_outcome(outcome: &'static str) {
    ::metrics::counter!("adapter_responses_total", "outcome" => outcome).increment(1);
}

/// Count one gateway request and its latency.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
