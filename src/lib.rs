//! Retouch simulation API library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod simulation;
pub mod validation;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
