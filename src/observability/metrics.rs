//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, outcome
//! - `router_request_duration_seconds` (histogram): time until the response left the server
//! - `router_routes_registered` (gauge): routes in the active table
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Label values come from fixed sets: methods outside the standard ones
//!   are counted as `OTHER`, so clients cannot create new series
//! - Outcome label separates real misses from bare-prefix hits, and from
//!   requests that never finished dispatch (timeouts)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Method label for anything outside the standard request methods.
pub const OTHER_METHOD: &str = "OTHER";

const STANDARD_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// How a request was resolved by the route table.
///
/// Dispatch stores it in the response extensions for the metrics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler was found and invoked.
    Matched,
    /// The path exists only as a prefix of longer routes.
    Prefix,
    /// No tree for the method, or no node for the path.
    Miss,
    /// Dispatch did not produce the response, e.g. the request timed out.
    Unfinished,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::Prefix => "prefix",
            Outcome::Miss => "miss",
            Outcome::Unfinished => "unfinished",
        }
    }
}

/// The metric label for a request method.
pub fn method_label(method: &str) -> &'static str {
    STANDARD_METHODS
        .iter()
        .find(|m| **m == method)
        .copied()
        .unwrap_or(OTHER_METHOD)
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, outcome: Outcome, start: Instant) {
    let method = method_label(method);
    metrics::counter!(
        "router_requests_total",
        "method" => method,
        "status" => status.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    metrics::histogram!("router_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_route_count(count: usize) {
    metrics::gauge!("router_routes_registered").set(count as f64);
}


#[cfg(test)]
mod tests {
    use super::recorder::KeyRecorder;
    use super::*;

    #[test]
    fn test_method_label() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("PATCH"), "PATCH");
        assert_eq!(method_label("get"), OTHER_METHOD);
        assert_eq!(method_label("X-CUSTOM"), OTHER_METHOD);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Matched.as_str(), "matched");
        assert_eq!(Outcome::Prefix.as_str(), "prefix");
        assert_eq!(Outcome::Miss.as_str(), "miss");
        assert_eq!(Outcome::Unfinished.as_str(), "unfinished");
    }

    #[test]
    fn test_unknown_methods_share_series() {
        let recorder = KeyRecorder::default();
        metrics::with_local_recorder(&recorder, || {
            for i in 0..50 {
                record_request(&format!("X{}", i), 404, Outcome::Miss, Instant::now());
            }
        });

        assert_eq!(
            recorder.series().into_iter().collect::<Vec<_>>(),
            vec![
                "router_request_duration_seconds{method=OTHER}".to_string(),
                "router_requests_total{method=OTHER,status=404,outcome=miss}".to_string(),
            ]
        );
    }
}
