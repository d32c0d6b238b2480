//! Route table file watcher for hot reload.
//!
//! Only the routes of a reloaded file take effect while serving. The
//! listener, timeouts and observability sections are read once at startup;
//! edits to them are reported and left for the next restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ServerConfig;

/// A watcher that monitors the route table file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    current: ServerConfig,
    update_tx: mpsc::UnboundedSender<ServerConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, which was loaded as `current` at startup.
    ///
    /// Returns the watcher and a receiver for validated configurations.
    pub fn new(path: &Path, current: ServerConfig) -> (Self, mpsc::UnboundedReceiver<ServerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Reload the file if `event` changed it.
    ///
    /// Returns the new configuration, or `None` when the event is not a
    /// change or the file no longer validates.
    pub fn on_event(&mut self, event: &Event) -> Option<ServerConfig> {
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return None;
        }

        tracing::info!(path = ?self.path, "Route table change detected, reloading");
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload route table, keeping current routes");
                return None;
            }
        };

        let ignored = unreloadable_changes(&self.current, &config);
        if !ignored.is_empty() {
            tracing::warn!(
                sections = ?ignored,
                "Changed settings only apply after a restart; reloading routes only"
            );
        }

        self.current = config.clone();
        Some(config)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(mut self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(config) = self.on_event(&event) {
                        let _ = tx.send(config);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Route table watcher started");
        Ok(watcher)
    }
}

/// Sections that differ between `old` and `new` but are not applied by a reload.
pub fn unreloadable_changes(old: &ServerConfig, new: &ServerConfig) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if old.listener != new.listener {
        changed.push("listener");
    }
    if old.timeouts != new.timeouts {
        changed.push("timeouts");
    }
    if old.observability != new.observability {
        changed.push("observability");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;
    use notify::event::{AccessKind, EventKind, ModifyKind};

    fn write_table(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("trie-router-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn modified(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.to_path_buf())
    }

    #[test]
    fn test_unreloadable_changes() {
        let old = ServerConfig::default();
        let mut new = ServerConfig::default();
        new.routes.push(RouteConfig::new("GET", "/", "x"));
        assert!(unreloadable_changes(&old, &new).is_empty());

        new.listener.bind_address = "127.0.0.1:1".into();
        new.observability.log_level = "debug".into();
        assert_eq!(unreloadable_changes(&old, &new), vec!["listener", "observability"]);
    }

    #[test]
    fn test_on_event_reloads_routes() {
        let path = write_table(
            "reload",
            "[timeouts]\nrequest_secs = 5\n\n[[routes]]\nmethod = \"GET\"\npath = \"/a\"\nbody = \"a\"\n",
        );
        let (mut watcher, _rx) = ConfigWatcher::new(&path, ServerConfig::default());

        let config = watcher.on_event(&modified(&path)).unwrap();
        assert_eq!(config.routes, vec![RouteConfig::new("GET", "/a", "a")]);
        assert_eq!(config.timeouts.request_secs, 5);
        // The last loaded file becomes the baseline for the next comparison.
        assert!(unreloadable_changes(&watcher.current, &config).is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_on_event_ignores_access_and_invalid_files() {
        let path = write_table("invalid", "[[routes]]\nmethod = \"GET\"\npath = \"/a/\"\n");
        let (mut watcher, _rx) = ConfigWatcher::new(&path, ServerConfig::default());

        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());
        assert!(watcher.on_event(&access).is_none());
        assert!(watcher.on_event(&modified(&path)).is_none());
        assert_eq!(watcher.current.listener, ServerConfig::default().listener);

        std::fs::remove_file(&path).unwrap();
    }
}
