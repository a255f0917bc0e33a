//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (CorsLayer: answer preflight, tag responses)
//!     → rate_limit.rs (fixed window per client, keyed by client_ip.rs)
//!     → body size limit per route (RequestBodyLimitLayer, wired in http/server.rs)
//!     → handler → upload.rs / sanitize.rs on untrusted names and text
//! Outgoing response:
//!     → headers.rs (security header table)
//! ```
//!
//! # Design Decisions
//! - Rate limit state lives behind `store::RateLimitStore`
//! - Upload screening runs on the raw name; sanitization runs after it
//! - No trust in client input

pub mod client_ip;
pub mod cors;
pub mod headers;
pub mod rate_limit;
pub mod sanitize;
pub mod store;
pub mod upload;

pub use rate_limit::{FixedWindowLimiter, RateLimitDecision};
pub use sanitize::{sanitize_effect_name, sanitize_file_name, sanitize_input, sanitize_region_name};
pub use store::{InMemoryStore, RateLimitRecord, RateLimitStore};
pub use upload::{screen_upload, UploadRejection};
