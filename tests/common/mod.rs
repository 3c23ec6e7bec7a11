//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use site_sync::{ConfigStore, ServerController};
use tempfile::TempDir;

/// A scratch web-server layout with input files.
pub struct Fixture {
    pub root: TempDir,
    pub store: ConfigStore,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let available = root.path().join("sites-available");
        let enabled = root.path().join("sites-enabled");
        fs::create_dir(&available).unwrap();
        fs::create_dir(&enabled).unwrap();
        let store = ConfigStore::new(available, enabled);
        Self { root, store }
    }

    /// Write an input file under the fixture root.
    #[allow(dead_code)]
    pub fn input(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Every file and link under both directories, with contents or targets.
    #[allow(dead_code)]
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for dir in [self.store.available_dir(), self.store.enabled_dir()] {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                let meta = fs::symlink_metadata(&path).unwrap();
                let value = if meta.file_type().is_symlink() {
                    format!("-> {}", fs::read_link(&path).unwrap().display())
                } else {
                    fs::read_to_string(&path).unwrap()
                };
                entries.push((relative(self.root.path(), &path), value));
            }
        }
        entries.sort();
        entries
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap().display().to_string()
}

/// Controller that records calls instead of running commands.
#[derive(Debug, Default)]
pub struct FakeServer {
    calls: Mutex<Vec<&'static str>>,
    pub invalid: Option<String>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn invalid(diagnostics: &str) -> Self {
        Self {
            invalid: Some(diagnostics.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl ServerController for FakeServer {
    async fn validate(&self) -> Result<String, String> {
        self.calls.lock().unwrap().push("validate");
        match &self.invalid {
            Some(d) => Err(d.clone()),
            None => Ok(String::new()),
        }
    }

    async fn reload(&self) -> Result<(), String> {
        self.calls.lock().unwrap().push("reload");
        Ok(())
    }

    async fn restart(&self) -> Result<(), String> {
        self.calls.lock().unwrap().push("restart");
        Ok(())
    }
}
