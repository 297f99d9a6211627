//! FindFace client metrics.
//!
//! - Request counters by operation and outcome
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total FindFace requests by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "findface_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "findface_latency_seconds";
}

/// Record metrics for a completed FindFace request.
pub fn record_request(operation: &str, outcome: &str, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.starts_with("findface_"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_request("detect", "ok", 12.0);
    }
}
