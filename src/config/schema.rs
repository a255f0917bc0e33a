//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every section
//! is `#[serde(default)]`, so an empty file yields [`AppConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Response headers, CORS and body limits.
    pub security: SecurityConfig,

    /// Mock processing behaviour.
    pub simulation: SimulationConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for a request, including the simulated delay.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Fixed-window rate limiting.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Requests admitted per client per window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Attach the security header table to every response.
    pub enable_headers: bool,

    /// Value of `Access-Control-Allow-Origin`. Read at startup.
    pub cors_origin: String,

    /// Largest accepted upload request body, in bytes.
    pub max_upload_body_bytes: usize,

    /// Largest accepted JSON request body, in bytes.
    pub max_json_body_bytes: usize,

    /// Reject suspicious upload names (traversal, executables, device names).
    pub screen_uploads: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            cors_origin: "http://localhost:3000".to_string(),
            max_upload_body_bytes: 12 * 1024 * 1024, // 10MB file plus multipart framing
            max_json_body_bytes: 1024 * 1024,
            screen_uploads: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Artificial delay before a processing result is returned.
    pub processing_delay_ms: u64,

    /// Bucket reported for uploads that do not name one.
    pub default_bucket: String,

    /// Environment name reported by the health endpoint.
    pub environment: String,
}

impl SimulationConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2000,
            default_bucket: "default".to_string(),
            environment: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// "pretty" for development, "json" for log shipping.
    pub log_format: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
