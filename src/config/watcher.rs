//! Configuration file watcher for hot reload.
//!
//! Only changes that load and validate are forwarded; a broken edit is logged
//! and the running configuration stays in place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// Receiving end of validated configuration reloads.
pub type ConfigUpdates = mpsc::UnboundedReceiver<AppConfig>;

/// Watch `path` and send each successfully reloaded config.
///
/// The returned watcher must be kept alive for updates to keep flowing.
pub fn watch_config(path: &Path) -> Result<(RecommendedWatcher, ConfigUpdates), notify::Error> {
    let (tx, rx) = mpsc::unbounded_channel();
    let watched: PathBuf = path.to_path_buf();
    let reload_path = watched.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if is_content_change(&event.kind) => match load_config(&reload_path) {
                Ok(config) => {
                    tracing::info!(path = ?reload_path, "Configuration reloaded from disk");
                    if tx.send(config).is_err() {
                        tracing::debug!("Config receiver dropped, ignoring reload");
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Rejected config reload, keeping current configuration"
                    );
                }
            },
            Ok(_) => {}
            Err(e) => tracing::error!(error = ?e, "Config watch error"),
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    )?;

    watcher.watch(&watched, RecursiveMode::NonRecursive)?;
    tracing::info!(path = ?watched, "Config watcher started");

    Ok((watcher, rx))
}

fn is_content_change(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create()
}
