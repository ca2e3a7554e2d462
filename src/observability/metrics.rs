//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define server metrics (requests, latency, cache efficiency, handler failures)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `builtin_server_requests_total` (counter): requests by status
//! - `builtin_server_request_duration_seconds` (histogram): latency distribution
//! - `builtin_server_path_cache_total` (counter): path cache lookups by result
//! - `builtin_server_access_denied_total` (counter): denials by reason
//! - `builtin_server_handler_failures_total` (counter): content handler failures
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, metrics disabled)
//! - Labels are low-cardinality: never the request path

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16, start: Instant) {
    ::metrics::counter!("builtin_server_requests_total", "status" => status.to_string()).increment(1);
    ::metrics::histogram!("builtin_server_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_path_cache(result: &'static str) {
    ::metrics::counter!("builtin_server_path_cache_total", "result" => result).increment(1);
}

pub fn record_access_denied(reason: &'static str) {
    ::metrics::counter!("builtin_server_access_denied_total", "reason" => reason).increment(1);
}

pub fn record_handler_failure(handler: &str) {
    ::metrics::counter!("builtin_server_handler_failures_total", "handler" => handler.to_string())
        .increment(1);
}
