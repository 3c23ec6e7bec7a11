//! Exclusive run lock.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("another run holds {} (remove it if no run is active)", path.display())]
    Held { path: PathBuf },

    #[error("failed to create lock file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A RAII guard that owns the lock file for the duration of a run.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Create the lock file, failing if it already exists.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => LockError::Held {
                    path: path.to_path_buf(),
                },
                _ => LockError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        let lock = Self {
            path: path.to_path_buf(),
        };
        writeln!(file, "{}", std::process::id()).map_err(|source| LockError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = ?path, "Acquired run lock");
        Ok(lock)
    }

    /// Acquire only when a lock path is configured.
    pub fn maybe_acquire(path: Option<&Path>) -> Result<Option<Self>, LockError> {
        path.map(Self::acquire).transpose()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = ?self.path, error = %e, "Failed to release run lock");
        }
    }
}
