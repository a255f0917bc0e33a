//! CORS policy.
//!
//! A single allowed origin comes from config; methods, headers and max-age are
//! fixed. `CorsLayer` answers every `OPTIONS` request as a preflight, so those
//! never reach a handler or the rate limiter.

use std::time::Duration;

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const ALLOW_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

pub const MAX_AGE: Duration = Duration::from_secs(86400);

/// Build the CORS layer for `origin`.
///
/// An origin that is not a valid header value yields a layer that emits no
/// `Access-Control-Allow-Origin`, so browsers refuse cross-origin reads.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(ALLOW_METHODS)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, X_REQUESTED_WITH])
        .max_age(MAX_AGE);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(_) => {
            tracing::warn!(
                origin,
                "Configured CORS origin is not a valid header value, omitting it"
            );
            layer
        }
    }
}
