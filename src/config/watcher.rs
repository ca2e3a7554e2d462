//! Configuration file watcher for project reload.
//!
//! # Design Decisions
//! - Watches the parent directory: editors often save by renaming a temporary
//!   file over the original, which ends a watch on the file itself
//! - Only events touching the configuration file trigger a reload
//! - Reloads whose text matches the last loaded text are skipped
//! - An invalid file keeps the current configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::WebServerConfig;

/// Monitors the configuration file and publishes reloaded configurations.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<WebServerConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for reloaded configurations.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<WebServerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        (Self { path, update_tx }, update_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for updates to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut last_content = std::fs::read_to_string(&path).ok();
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event, &watched) => {
                    let content = std::fs::read_to_string(&watched).ok();
                    if content.is_none() || last_content == content {
                        return;
                    }
                    last_content = content;

                    tracing::info!(path = ?watched, "Config file change detected, reloading");
                    match load_config(&watched) {
                        Ok(config) => {
                            tracing::info!(projects = config.projects.len(), "Config reloaded");
                            let _ = update_tx.send(config);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

fn is_relevant(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|changed| changed == path)
}
