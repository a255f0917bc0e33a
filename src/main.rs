//! Retouch simulation API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id / trace / timeout
//!                     → security headers, CORS
//!                     → rate limiter (client identity)
//!                     → body limit
//!                     → handler → validation → sanitization → simulation engine
//!     ◀────────────── JSON response
//!
//!     Cross-cutting: config (TOML + hot reload), observability (logs,
//!     metrics, security audit), lifecycle (signals, graceful shutdown)
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use retouch_sim::config::{load_config, loader::config_path_from_env, AppConfig};
use retouch_sim::http::HttpServer;
use retouch_sim::lifecycle::{shutdown_signal, Shutdown};
use retouch_sim::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "retouch-sim")]
#[command(about = "Retouch simulation API server", long_about = None)]
struct Args {
    /// TOML config file; overrides RETOUCH_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = args.config.or_else(config_path_from_env);

    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "retouch-sim starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = %config.simulation.environment,
        rate_limit_enabled = config.rate_limit.enabled,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        config_file = ?config_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher stops when dropped, so it lives until main returns.
    let (_watcher, config_updates) = match &config_path {
        Some(path) => {
            let (watcher, updates) = retouch_sim::config::watch_config(path)
                .context("failed to start config watcher")?;
            (Some(watcher), updates)
        }
        None => {
            let (_tx, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.listener.bind_address))?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let mut server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result.context("server task panicked")??;
        }
        _ = shutdown_signal() => {
            shutdown.trigger();
            server_task.await.context("server task panicked")??;
        }
    }
    tracing::info!("Shutdown complete");
    Ok(())
}
