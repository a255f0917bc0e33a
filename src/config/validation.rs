//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected rather than stopping at the first one.

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::AppConfig;
use crate::security::rate_limit::MAX_WINDOW;
use crate::validation::MAX_FILE_SIZE;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ConfigValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ConfigValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ConfigValidationError::new(
                "rate_limit.max_requests",
                "must be greater than 0 when rate limiting is enabled",
            ));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ConfigValidationError::new(
                "rate_limit.window_secs",
                "must be greater than 0",
            ));
        } else if config.rate_limit.window_secs > MAX_WINDOW.as_secs() {
            errors.push(ConfigValidationError::new(
                "rate_limit.window_secs",
                format!("must be at most {} (one year)", MAX_WINDOW.as_secs()),
            ));
        }
    }

    let origin = &config.security.cors_origin;
    if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
        errors.push(ConfigValidationError::new(
            "security.cors_origin",
            "must be a non-empty header value",
        ));
    }

    if (config.security.max_upload_body_bytes as u64) < MAX_FILE_SIZE {
        errors.push(ConfigValidationError::new(
            "security.max_upload_body_bytes",
            format!("must be at least {MAX_FILE_SIZE} to admit a full-size image"),
        ));
    }

    if config.security.max_json_body_bytes == 0 {
        errors.push(ConfigValidationError::new(
            "security.max_json_body_bytes",
            "must be greater than 0",
        ));
    }

    if config.simulation.processing_delay_ms >= config.timeouts.request_secs.saturating_mul(1000) {
        errors.push(ConfigValidationError::new(
            "simulation.processing_delay_ms",
            "must be shorter than timeouts.request_secs",
        ));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ConfigValidationError::new(
            "observability.log_format",
            format!("'{}' is not one of: pretty, json", config.observability.log_format),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ConfigValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
