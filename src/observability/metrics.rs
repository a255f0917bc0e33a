//! Metrics collection and exposition.
//!
//! # Metrics
//! - `retouch_requests_total` (counter): requests by method, route, status
//! - `retouch_request_duration_seconds` (histogram): latency by route
//! - `retouch_rate_limited_total` (counter): denied requests by reason
//! - `retouch_validation_failures_total` (counter): failures by entity, check
//! - `retouch_uploads_total` (counter): accepted uploads by format
//! - `retouch_upload_rejections_total` (counter): screened uploads by reason
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("retouch_requests_total", &labels).increment(1);
    histogram!("retouch_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(reason: &'static str) {
    counter!("retouch_rate_limited_total", "reason" => reason).increment(1);
}

pub fn record_validation_failure(entity: &'static str, check: &'static str) {
    counter!(
        "retouch_validation_failures_total",
        "entity" => entity,
        "check" => check
    )
    .increment(1);
}

pub fn record_upload(format: &'static str) {
    counter!("retouch_uploads_total", "format" => format).increment(1);
}

pub fn record_upload_rejection(reason: &'static str) {
    counter!("retouch_upload_rejections_total", "reason" => reason).increment(1);
}
