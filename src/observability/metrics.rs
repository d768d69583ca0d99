//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_request_duration_seconds` (histogram): latency per request
//! - `gateway_access_decisions_total` (counter): policy outcomes by decision
//! - `gateway_token_rejections_total` (counter): bearer tokens that failed verification
//! - `gateway_path_rejections_total` (counter): request paths refused before evaluation
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so tests need no setup
//! - Prometheus exporter is only started when enabled in config

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request_duration(elapsed_secs: f64) {
    histogram!("gateway_request_duration_seconds").record(elapsed_secs);
}

pub fn record_decision(decision: &'static str) {
    counter!("gateway_access_decisions_total", "decision" => decision).increment(1);
}

pub fn record_token_rejected() {
    counter!("gateway_token_rejections_total").increment(1);
}

pub fn record_path_rejected() {
    counter!("gateway_path_rejections_total").increment(1);
}
