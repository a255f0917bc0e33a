//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level. The format is
//! "pretty" for development or "json" for log shipping.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default directives when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("retouch_sim={level},tower_http={level}")
}

/// Install the global tracing subscriber. Call once, at startup.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry.with(fmt::layer().json().with_current_span(true)).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
