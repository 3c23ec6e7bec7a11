//! Input file watcher for watch mode.
//!
//! # Design Decisions
//! - The parent directory of each input is watched, not the file itself.
//!   Editors save by renaming a temp file over the original, which replaces
//!   the inode a file watch is attached to
//! - Events are filtered down to the configured file names

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Watches the project list and template set for changes.
///
/// Each relevant filesystem event is forwarded as the path that changed;
/// consumers decide whether to re-run a sync.
pub struct InputWatcher {
    paths: Vec<PathBuf>,
    change_tx: mpsc::UnboundedSender<PathBuf>,
}

impl InputWatcher {
    /// Create a new InputWatcher.
    ///
    /// Returns the watcher and a receiver for change notifications.
    pub fn new(paths: &[&Path]) -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (
            Self {
                paths: paths.iter().map(|p| p.to_path_buf()).collect(),
                change_tx,
            },
            change_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned handle must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();
        let names: BTreeSet<OsString> = self
            .paths
            .iter()
            .filter_map(|p| p.file_name().map(OsString::from))
            .collect();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let inputs = event
                            .paths
                            .into_iter()
                            .filter(|p| p.file_name().is_some_and(|n| names.contains(n)));
                        for path in inputs {
                            tracing::debug!(path = ?path, "Input file change detected");
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for dir in watched_dirs(&self.paths) {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(paths = ?self.paths, "Input watcher started");
        Ok(watcher)
    }
}

/// Distinct parent directories of `paths`; a bare file name means `.`.
fn watched_dirs(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
    paths
        .iter()
        .map(|p| match p.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        })
        .collect()
}
