//! Configuration schema definitions.
//!
//! This module defines the tool configuration: where site entries live,
//! which commands drive the web server, and logging defaults.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for site-sync.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Filesystem locations.
    pub paths: PathsConfig,

    /// External web-server commands.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Filesystem locations for inputs and site entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding defined (available) site entries.
    pub available_dir: PathBuf,

    /// Directory holding activation links (enabled entries).
    pub enabled_dir: PathBuf,

    /// JSON list of project descriptors.
    pub projects_file: PathBuf,

    /// JSON template set.
    pub templates_file: PathBuf,

    /// Exclusive lock file for mutating runs. Disabled when unset.
    pub lock_file: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            available_dir: PathBuf::from("/etc/nginx/sites-available"),
            enabled_dir: PathBuf::from("/etc/nginx/sites-enabled"),
            projects_file: PathBuf::from("projects.json"),
            templates_file: PathBuf::from("nginx_templates.json"),
            lock_file: None,
        }
    }
}

/// What to do with the server after a successful configuration test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostSyncAction {
    #[default]
    Reload,
    Restart,
}

impl std::fmt::Display for PostSyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostSyncAction::Reload => f.write_str("reload"),
            PostSyncAction::Restart => f.write_str("restart"),
        }
    }
}

/// Commands used to test, reload and restart the web server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Configuration test command (exit code 0 = valid).
    pub test_command: Vec<String>,

    /// Graceful reload command.
    pub reload_command: Vec<String>,

    /// Full restart command.
    pub restart_command: Vec<String>,

    /// Action taken after a passing configuration test.
    pub post_sync_action: PostSyncAction,

    /// Deadline for each external command in seconds.
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            test_command: vec!["nginx".into(), "-t".into()],
            reload_command: vec!["systemctl".into(), "reload".into(), "nginx".into()],
            restart_command: vec!["systemctl".into(), "restart".into(), "nginx".into()],
            post_sync_action: PostSyncAction::Reload,
            timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
