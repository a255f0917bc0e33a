//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (trace, request ID, timeout, security headers, CORS,
//!   rate limiting, body limits)
//! - Apply configuration reloads to the live state
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::{ArcSwap, Guard};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::{forms, health, process, request, upload};
use crate::security::{cors, headers, rate_limit, FixedWindowLimiter};
use crate::simulation::SimulationEngine;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ArcSwap<AppConfig>>,
    pub limiter: Arc<FixedWindowLimiter>,
    pub engine: Arc<SimulationEngine>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            limiter,
            engine: Arc::new(SimulationEngine::new()),
            started_at: Instant::now(),
        }
    }

    /// Snapshot of the live configuration.
    pub fn config(&self) -> Guard<Arc<AppConfig>> {
        self.config.load()
    }

    /// Replace the live configuration.
    ///
    /// Limiter sizing, CORS origin, body limits and the listener address are
    /// fixed at startup.
    pub fn update_config(&self, config: AppConfig) {
        let current = self.config.load();
        if current.rate_limit != config.rate_limit {
            tracing::warn!("Rate limit settings changed on disk; they apply after restart");
        }
        if current.security.cors_origin != config.security.cors_origin {
            tracing::warn!("CORS origin changed on disk; it applies after restart");
        }
        if current.listener != config.listener {
            tracing::warn!("Listener settings changed on disk; they apply after restart");
        }
        self.config.store(Arc::new(config));
        tracing::info!("Live configuration updated");
    }
}

/// HTTP server for the retouch simulation API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: AppConfig) -> Self {
        let state = AppState::new(config);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Body limits, the CORS origin and the request timeout are read once here.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let config = state.config();
        let json_limit = config.security.max_json_body_bytes;
        let upload_limit = config.security.max_upload_body_bytes;
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        let uploads = Router::new()
            .route("/api/upload", post(upload::upload_file))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(upload_limit));

        let api = Router::new()
            .route("/api/process", post(process::process_image))
            .route("/api/validate/file", post(forms::validate_file))
            .route("/api/validate/region", post(forms::validate_region))
            .route("/api/validate/effect", post(forms::validate_effect))
            .route("/api/validate/export", post(forms::validate_export))
            .route("/api/sanitize", post(forms::sanitize))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(json_limit));

        let limited = uploads
            .merge(api)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::rate_limit_middleware,
            ));

        Router::new()
            .route("/api/health", get(health::health_check))
            .merge(limited)
            .layer(cors::cors_layer(&config.security.cors_origin))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                headers::security_headers_middleware,
            ))
            .layer(middleware::from_fn(request::record_metrics))
            .with_state(state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(request::UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                state.update_config(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
