//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webhook_events_total` (counter): handled webhooks by outcome
//! - `agent_deliveries_total` (counter): messages sent by route, status
//! - `agent_delivery_duration_seconds` (histogram): delivery latency by route
//! - `agent_status_probes_total` (counter): status probes by route, result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - Labels for route, status code, outcome

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_webhook(outcome: &'static str) {
    counter!("webhook_events_total", "outcome" => outcome).increment(1);
}

pub fn record_delivery(route: &str, status: &str, start: Instant) {
    counter!(
        "agent_deliveries_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("agent_delivery_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_probe(route: &str, result: &'static str) {
    counter!("agent_status_probes_total", "route" => route.to_string(), "result" => result).increment(1);
}
