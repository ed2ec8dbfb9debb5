//! Metrics collection and exposition.
//!
//! # Metrics
//! - `netdiag_probe_requests_total` (counter): probe requests by outcome
//! - `netdiag_probe_latency_seconds` (histogram): probe latency, every attempt
//! - `netdiag_capacity_steps_total` (counter): capacity steps by verdict
//! - `netdiag_capacity_max_healthy_requests` (gauge): result of the last search
//! - `netdiag_commands_total` (counter): diagnostic tool runs by program, status
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(success: bool, elapsed: Duration) {
    let outcome = if success { "success" } else { "failure" };
    counter!("netdiag_probe_requests_total", "outcome" => outcome).increment(1);
    histogram!("netdiag_probe_latency_seconds").record(elapsed.as_secs_f64());
}

pub fn record_step(healthy: bool) {
    let verdict = if healthy { "true" } else { "false" };
    counter!("netdiag_capacity_steps_total", "healthy" => verdict).increment(1);
}

pub fn record_max_healthy(level: u32) {
    gauge!("netdiag_capacity_max_healthy_requests").set(f64::from(level));
}

pub fn record_command(program: &str, status: &'static str) {
    counter!(
        "netdiag_commands_total",
        "program" => program.to_string(),
        "status" => status
    )
    .increment(1);
}
