//! Security event logging.
//!
//! Events go to the `security` tracing target at WARN so they can be routed
//! separately from request logs.

use axum::http::{header, HeaderMap};

pub const SECURITY_TARGET: &str = "security";

pub fn log_security_event(event: &str, client: &str, path: &str, headers: &HeaderMap) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::warn!(
        target: SECURITY_TARGET,
        event,
        client,
        path,
        user_agent,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "Security event"
    );
}
