//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, path from RETOUCH_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → stored in an ArcSwap shared by handlers and middleware
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the live AppConfig
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Listener address and limiter sizing are read once at startup; other
//!   settings take effect on reload

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, SecurityConfig,
    SimulationConfig, TimeoutConfig,
};
pub use validation::{validate_config, ConfigValidationError};
pub use watcher::{watch_config, ConfigUpdates};
