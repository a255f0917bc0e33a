//! Client identity for rate limiting and audit logs.

use axum::http::HeaderMap;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Identifier used when no client address header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First `X-Forwarded-For` entry, else `X-Real-IP`, else `"unknown"`.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = header_str(headers, X_FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| header_str(headers, X_REAL_IP).map(str::trim).filter(|ip| !ip.is_empty()))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
