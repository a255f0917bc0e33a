//! Per-request tracing span and metrics.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client sent none
//! - Attach the request ID to the request span
//! - Record count and latency for every response, keyed by matched route

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::observability::metrics;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Route label used when no route matched.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the span for one request, tagged with its ID.
pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// Record request count and latency once the response is ready.
pub async fn record_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::debug!(
        route = %route,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(method.as_str(), &route, status, start);
    response
}
