//! Metrics collection and exposition.
//!
//! # Metrics
//! - `chat_proxy_requests_total` (counter): chat requests by outcome and status
//! - `chat_proxy_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The Prometheus exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Outcome label: upstream answered and was relayed.
pub const OUTCOME_RELAYED: &str = "relayed";
/// Outcome label: the request body could not be extracted.
pub const OUTCOME_REJECTED: &str = "rejected";

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished chat request.
pub fn record_chat_request(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "chat_proxy_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("chat_proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
