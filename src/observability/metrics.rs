//! Metrics collection and exposition.
//!
//! # Metrics
//! - `giga_requests_total` (counter): requests by method, route, status
//! - `giga_request_duration_seconds` (histogram): dispatch latency by method, route
//! - `giga_in_flight_requests` (gauge): requests currently being handled
//!
//! # Design Decisions
//! - Route label is the matched pattern, not the raw path, to bound cardinality
//! - Unmatched requests are labelled `unmatched`
//! - Non-standard methods are labelled `other`

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(method: &str, route: Option<&str>, status: StatusCode, start: Instant) {
    let route = route.unwrap_or("unmatched").to_string();
    let method = method_label(method);

    ::metrics::counter!(
        "giga_requests_total",
        "method" => method,
        "route" => route.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "giga_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn set_in_flight(count: u64) {
    ::metrics::gauge!("giga_in_flight_requests").set(count as f64);
}

/// Standard methods keep their name; extension methods share one label.
fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_bounds_cardinality() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("PATCH"), "PATCH");
        assert_eq!(method_label("BREW"), "other");
        assert_eq!(method_label("get"), "other");
    }
}
