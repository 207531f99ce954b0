//! Metrics collection.
//!
//! # Metrics
//! - `stream_rpc_requests_total` (counter): JSON-RPC calls by method, outcome
//! - `stream_rpc_request_duration_seconds` (histogram): latency per method
//! - `stream_rpc_endpoint_healthy` (gauge): 1=healthy, 0=unhealthy
//! - `stream_submissions_total` (counter): submitted transactions by status

use std::time::Instant;

/// Outcome label for an RPC call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    /// The node answered with a JSON-RPC error object.
    Rejected,
    /// The node answered a JSON-RPC envelope with neither result nor error.
    Malformed,
    Timeout,
    Transport,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Ok => "ok",
            CallOutcome::Rejected => "rejected",
            CallOutcome::Malformed => "malformed",
            CallOutcome::Timeout => "timeout",
            CallOutcome::Transport => "transport",
        }
    }
}

/// Record one JSON-RPC call.
pub fn record_rpc_call(method: &str, outcome: CallOutcome, started: Instant) {
    metrics::counter!(
        "stream_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    metrics::histogram!("stream_rpc_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record endpoint reachability.
pub fn record_endpoint_health(endpoint: &str, healthy: bool) {
    metrics::gauge!("stream_rpc_endpoint_healthy", "endpoint" => endpoint.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Record a submitted transaction.
pub fn record_submission(function: &str, success: bool) {
    metrics::counter!(
        "stream_submissions_total",
        "function" => function.to_string(),
        "status" => if success { "success" } else { "failure" }
    )
    .increment(1);
}
