//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → audit.rs (security events on their own target)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every request span
//! - Metrics are recorded from middleware and handlers, never from validators

pub mod audit;
pub mod logging;
pub mod metrics;
