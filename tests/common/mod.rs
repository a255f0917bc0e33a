//! Shared helpers for integration tests.

use std::net::SocketAddr;

use retouch_sim::config::AppConfig;
use retouch_sim::http::HttpServer;
use retouch_sim::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A running server on a local port; dropping it stops the server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config suited to tests: no processing delay, no metrics listener.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.simulation.processing_delay_ms = 0;
    config.observability.metrics_enabled = false;
    config
}

/// Boot a server with `config` on an ephemeral port.
pub async fn start_server(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}
