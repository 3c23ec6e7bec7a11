//! Site entry storage.
//!
//! # Layout
//! ```text
//! available_dir/<name>   defined entry (rendered body)
//! enabled_dir/<name>     symlink → available_dir/<name>
//! ```
//!
//! # Design Decisions
//! - Defined and enabled are inspected separately so dangling activations
//!   show up without extra bookkeeping
//! - Writes go through a temp file in the same directory and a no-clobber
//!   rename, so an entry that appears after the presence check is kept
//! - Removal of an absent entry is `Ok(false)`, never an error

pub mod entry;

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

pub use entry::{AvailableEntry, ConfigEntry, EnabledEntry, SiteListing};

const ENTRY_MODE: u32 = 0o644;

/// Filesystem failure tied to the path it happened on.
#[derive(Debug, thiserror::Error)]
#[error("{op} {}: {source}", path.display())]
pub struct StoreError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl StoreError {
    /// The target was already there when the write landed.
    pub fn is_already_exists(&self) -> bool {
        self.source.kind() == io::ErrorKind::AlreadyExists
    }

    fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Available/enabled directory pair.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    available_dir: PathBuf,
    enabled_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(available_dir: impl Into<PathBuf>, enabled_dir: impl Into<PathBuf>) -> Self {
        Self {
            available_dir: available_dir.into(),
            enabled_dir: enabled_dir.into(),
        }
    }

    pub fn available_dir(&self) -> &Path {
        &self.available_dir
    }

    pub fn enabled_dir(&self) -> &Path {
        &self.enabled_dir
    }

    pub fn available_path(&self, name: &str) -> PathBuf {
        self.available_dir.join(name)
    }

    pub fn enabled_path(&self, name: &str) -> PathBuf {
        self.enabled_dir.join(name)
    }

    /// Inspect both facets of `name`. Dangling links count as present.
    pub fn exists(&self, name: &str) -> ConfigEntry {
        ConfigEntry {
            defined: fs::symlink_metadata(self.available_path(name)).is_ok(),
            enabled: fs::symlink_metadata(self.enabled_path(name)).is_ok(),
        }
    }

    /// Write `content` as the available entry for `name`, atomically.
    ///
    /// Never replaces an existing entry; see [`StoreError::is_already_exists`].
    pub fn write(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.available_path(name);

        let mut tmp = NamedTempFile::new_in(&self.available_dir)
            .map_err(|e| StoreError::new("create temp file in", &self.available_dir, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .and_then(|_| {
                tmp.as_file()
                    .set_permissions(fs::Permissions::from_mode(ENTRY_MODE))
            })
            .map_err(|e| StoreError::new("write", tmp.path(), e))?;
        tmp.persist_noclobber(&path)
            .map_err(|e| StoreError::new("rename into", &path, e.error))?;

        tracing::debug!(
            site = %name,
            path = ?path,
            bytes = content.len(),
            "Wrote available entry"
        );
        Ok(())
    }

    /// Link the enabled entry to the available one unless something is
    /// already there.
    pub fn activate(&self, name: &str) -> Result<(), StoreError> {
        let link = self.enabled_path(name);
        if fs::symlink_metadata(&link).is_ok() {
            tracing::debug!(site = %name, "Activation link already present");
            return Ok(());
        }

        let target = self.available_path(name);
        let target = std::path::absolute(&target)
            .map_err(|e| StoreError::new("resolve", &target, e))?;
        symlink(&target, &link).map_err(|e| StoreError::new("link", &link, e))?;

        tracing::debug!(site = %name, link = ?link, target = ?target, "Activated site");
        Ok(())
    }

    /// Remove the activation link. Non-links are left alone.
    pub fn remove_enabled(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.enabled_path(name);
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::remove_file(&path).map_err(|e| StoreError::new("remove", &path, e))?;
                Ok(true)
            }
            Ok(_) => {
                tracing::warn!(path = ?path, "Enabled entry is not a link, leaving it in place");
                Ok(false)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::new("inspect", &path, e)),
        }
    }

    /// Remove the available entry. Directories are left alone.
    pub fn remove_available(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.available_path(name);
        match fs::symlink_metadata(&path) {
            Ok(meta) if !meta.is_dir() => {
                fs::remove_file(&path).map_err(|e| StoreError::new("remove", &path, e))?;
                Ok(true)
            }
            Ok(_) => {
                tracing::warn!(
                    path = ?path,
                    "Available entry is a directory, leaving it in place"
                );
                Ok(false)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::new("inspect", &path, e)),
        }
    }

    /// Read the body of an available entry.
    pub fn read_available(&self, name: &str) -> Result<String, StoreError> {
        let path = self.available_path(name);
        fs::read_to_string(&path).map_err(|e| StoreError::new("read", &path, e))
    }

    /// Read the body behind an enabled entry, following its link.
    pub fn read_enabled(&self, name: &str) -> Result<String, StoreError> {
        let path = self.enabled_path(name);
        fs::read_to_string(&path).map_err(|e| StoreError::new("read", &path, e))
    }

    /// Snapshot both directories.
    pub fn list(&self) -> Result<SiteListing, StoreError> {
        let available = sorted_names(&self.available_dir)?
            .into_iter()
            .map(|name| AvailableEntry {
                path: self.available_path(&name),
                name,
            })
            .collect();

        let enabled = sorted_names(&self.enabled_dir)?
            .into_iter()
            .map(|name| {
                let path = self.enabled_path(&name);
                let target = fs::read_link(&path).ok();
                let dangling = target.is_some() && !path.exists();
                EnabledEntry {
                    name,
                    target,
                    dangling,
                }
            })
            .collect();

        Ok(SiteListing { available, enabled })
    }
}

fn sorted_names(dir: &Path) -> Result<Vec<String>, StoreError> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::new("list", dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::new("list", dir, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let root = tempfile::tempdir().unwrap();
        let available = root.path().join("sites-available");
        let enabled = root.path().join("sites-enabled");
        fs::create_dir(&available).unwrap();
        fs::create_dir(&enabled).unwrap();
        (root, ConfigStore::new(available, enabled))
    }

    #[test]
    fn test_write_then_activate() {
        let (_root, store) = store();
        assert_eq!(store.exists("a"), ConfigEntry::default());

        store.write("a", "server8080").unwrap();
        assert_eq!(store.exists("a"), ConfigEntry { defined: true, enabled: false });

        store.activate("a").unwrap();
        assert_eq!(store.exists("a"), ConfigEntry { defined: true, enabled: true });

        let link = store.enabled_path("a");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), store.available_path("a"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "server8080");
    }

    #[test]
    fn test_written_entry_is_world_readable() {
        let (_root, store) = store();
        store.write("a", "x").unwrap();
        let mode = fs::metadata(store.available_path("a")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, ENTRY_MODE);
    }

    #[test]
    fn test_write_never_replaces_existing_entry() {
        let (_root, store) = store();
        fs::write(store.available_path("a"), "hand edited").unwrap();

        let err = store.write("a", "rendered").unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(store.read_available("a").unwrap(), "hand edited");

        let leftovers = fs::read_dir(store.available_dir()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_activate_is_idempotent() {
        let (_root, store) = store();
        store.write("a", "x").unwrap();
        store.activate("a").unwrap();
        store.activate("a").unwrap();
        assert!(store.exists("a").enabled);
    }

    #[test]
    fn test_write_failure_leaves_nothing() {
        let root = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(root.path().join("missing"), root.path().join("enabled"));
        let err = store.write("a", "x").unwrap_err();
        assert_eq!(err.op, "create temp file in");
        assert!(!store.exists("a").defined);
    }

    #[test]
    fn test_dangling_link_counts_as_present() {
        let (_root, store) = store();
        symlink(store.available_path("gone"), store.enabled_path("gone")).unwrap();

        let entry = store.exists("gone");
        assert!(entry.is_present());
        assert!(entry.is_dangling());
    }

    #[test]
    fn test_remove_reports_what_happened() {
        let (_root, store) = store();
        store.write("a", "x").unwrap();
        store.activate("a").unwrap();

        assert!(store.remove_enabled("a").unwrap());
        assert!(!store.remove_enabled("a").unwrap());
        assert!(store.remove_available("a").unwrap());
        assert!(!store.remove_available("a").unwrap());
        assert!(!store.exists("a").is_present());
    }

    #[test]
    fn test_remove_enabled_skips_regular_files() {
        let (_root, store) = store();
        fs::write(store.enabled_path("plain"), "x").unwrap();
        assert!(!store.remove_enabled("plain").unwrap());
        assert!(store.enabled_path("plain").exists());
    }

    #[test]
    fn test_list_is_sorted_and_flags_dangling() {
        let (_root, store) = store();
        for name in ["b", "a"] {
            store.write(name, name).unwrap();
            store.activate(name).unwrap();
        }
        symlink(store.available_path("ghost"), store.enabled_path("ghost")).unwrap();

        let listing = store.list().unwrap();
        let available: Vec<_> = listing.available.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(available, ["a", "b"]);

        let enabled: Vec<_> = listing
            .enabled
            .iter()
            .map(|e| (e.name.as_str(), e.dangling))
            .collect();
        assert_eq!(enabled, [("a", false), ("b", false), ("ghost", true)]);
    }
}
