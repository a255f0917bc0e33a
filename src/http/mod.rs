//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (router, request ID, trace span, timeout)
//!     → request.rs (metrics), headers and CORS (security/)
//!     → rate limit and body limit (security/)
//!     → health.rs / upload.rs / process.rs / forms.rs
//!     → error.rs (JSON error bodies)
//! ```

pub mod error;
pub mod forms;
pub mod health;
pub mod process;
pub mod request;
pub mod server;
pub mod upload;

pub use error::{ApiError, ErrorBody};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
