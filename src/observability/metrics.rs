//! Metrics collection and exposition.
//!
//! # Metrics
//! - `charity_http_requests_total` (counter): requests by method, status
//! - `charity_http_request_duration_seconds` (histogram): latency distribution
//! - `charity_rpc_calls_total` (counter): JSON-RPC calls by method, outcome
//! - `charity_backend_health` (gauge): 1=healthy, 0=unhealthy
//! - `charity_balance_cache_lookups_total` (counter): hits and misses
//! - `charity_store_fallback_total` (counter): mock store installations
//! - `charity_donations_recorded_total` (counter): donations by target kind
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests and the
//!   CLI never need to set anything up
//! - Prometheus scrape endpoint served on its own listener

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished HTTP request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "charity_http_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "charity_http_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record a JSON-RPC call outcome.
pub fn record_rpc_call(method: &str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!(
        "charity_rpc_calls_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record health of an external dependency.
pub fn record_backend_health(backend: &str, healthy: bool) {
    metrics::gauge!("charity_backend_health", "backend" => backend.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("charity_balance_cache_lookups_total", "result" => result).increment(1);
}

/// The real store could not be built and the mock store was installed.
pub fn record_store_fallback() {
    metrics::counter!("charity_store_fallback_total").increment(1);
}

/// `target` is `request` or `project`.
pub fn record_donation(target: &'static str) {
    metrics::counter!("charity_donations_recorded_total", "target" => target).increment(1);
}
