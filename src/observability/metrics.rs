//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_calls_total` (counter): calls through a gate by `gate`, `outcome`
//! - `gate_forced_passes_total` (counter): calls let through after the
//!   blocked-pass budget ran out, by `gate`
//! - `gate_blocking` (gauge): 1 while a gate is blocking, 0 otherwise

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a single call through a gate ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    RecognizedFailure,
    UnrecognizedFailure,
    Blocked,
}

impl CallOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CallOutcome::Success => "success",
            CallOutcome::RecognizedFailure => "recognized_failure",
            CallOutcome::UnrecognizedFailure => "unrecognized_failure",
            CallOutcome::Blocked => "blocked",
        }
    }
}

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_gate_call(gate: &str, outcome: CallOutcome) {
    ::metrics::counter!(
        "gate_calls_total",
        "gate" => gate.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_forced_pass(gate: &str) {
    ::metrics::counter!("gate_forced_passes_total", "gate" => gate.to_string()).increment(1);
}

pub fn set_gate_blocking(gate: &str, blocking: bool) {
    ::metrics::gauge!("gate_blocking", "gate" => gate.to_string())
        .set(if blocking { 1.0 } else { 0.0 });
}
