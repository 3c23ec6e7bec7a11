//! Site removal.

use serde::Serialize;

use crate::config::PostSyncAction;
use crate::project::is_safe_name;
use crate::server::{apply_changes, ServerController, ServerOutcome};
use crate::store::{ConfigStore, StoreError};

/// What removal did for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub name: String,
    /// Activation link removed.
    pub enabled_removed: bool,
    /// Available entry removed.
    pub available_removed: bool,
    /// Link was present without a definition.
    pub dangling: bool,
    /// Set when the name was refused or the filesystem failed.
    pub error: Option<String>,
}

impl Removal {
    pub fn changed(&self) -> bool {
        self.enabled_removed || self.available_removed
    }
}

/// Result of deleting a set of sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub removals: Vec<Removal>,
    pub server: ServerOutcome,
}

/// Remove one site: activation link first, then the definition.
pub fn remove_site(store: &ConfigStore, name: &str) -> Removal {
    let mut removal = Removal {
        name: name.to_owned(),
        enabled_removed: false,
        available_removed: false,
        dangling: false,
        error: None,
    };

    if !is_safe_name(name) {
        tracing::error!(site = %name, "Refusing to delete: not a plain site name");
        removal.error = Some(format!("invalid site name '{name}'"));
        return removal;
    }

    removal.dangling = store.exists(name).is_dangling();
    if let Err(e) = try_remove(store, name, &mut removal) {
        tracing::error!(site = %name, error = %e, "Failed to delete site");
        removal.error = Some(e.to_string());
    }
    removal
}

fn try_remove(store: &ConfigStore, name: &str, removal: &mut Removal) -> Result<(), StoreError> {
    removal.enabled_removed = store.remove_enabled(name)?;
    if removal.enabled_removed {
        tracing::info!(
            site = %name,
            dangling = removal.dangling,
            path = ?store.enabled_path(name),
            "Removed activation link"
        );
    } else {
        tracing::info!(site = %name, "No activation link found");
    }

    removal.available_removed = store.remove_available(name)?;
    if removal.available_removed {
        tracing::info!(
            site = %name,
            path = ?store.available_path(name),
            "Removed configuration file"
        );
    } else {
        tracing::info!(site = %name, "No configuration file found");
    }
    Ok(())
}

/// Remove every named site, then validate and reload if anything changed.
pub async fn delete_sites<C: ServerController>(
    store: &ConfigStore,
    names: &[String],
    controller: &C,
    action: PostSyncAction,
) -> DeleteReport {
    let removals: Vec<Removal> = names.iter().map(|name| remove_site(store, name)).collect();
    let changed = removals.iter().any(Removal::changed);
    let server = apply_changes(controller, changed, action).await;

    DeleteReport { removals, server }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::RecordingController;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("available")).unwrap();
        fs::create_dir(root.path().join("enabled")).unwrap();
        let store = ConfigStore::new(root.path().join("available"), root.path().join("enabled"));
        (root, store)
    }

    #[test]
    fn test_removes_both_facets() {
        let (_root, store) = store();
        store.write("a", "x").unwrap();
        store.activate("a").unwrap();

        let removal = remove_site(&store, "a");
        assert!(removal.enabled_removed && removal.available_removed);
        assert!(!removal.dangling);
        assert!(!store.exists("a").is_present());
    }

    #[test]
    fn test_reports_dangling_activation() {
        let (_root, store) = store();
        symlink(store.available_path("ghost"), store.enabled_path("ghost")).unwrap();

        let removal = remove_site(&store, "ghost");
        assert!(removal.dangling);
        assert!(removal.enabled_removed);
        assert!(!removal.available_removed);
    }

    #[test]
    fn test_refuses_path_like_names() {
        let (_root, store) = store();
        let removal = remove_site(&store, "../enabled");
        assert!(removal.error.is_some());
        assert!(!removal.changed());
        assert!(store.enabled_dir().exists());
    }

    #[tokio::test]
    async fn test_nothing_removed_skips_server() {
        let (_root, store) = store();
        let controller = RecordingController::default();
        let report =
            delete_sites(&store, &["absent".into()], &controller, PostSyncAction::Reload).await;

        assert_eq!(report.server, ServerOutcome::NoChanges);
        assert!(controller.calls().is_empty());
    }

    #[tokio::test]
    async fn test_removal_validates_then_reloads() {
        let (_root, store) = store();
        store.write("a", "x").unwrap();
        let controller = RecordingController::default();
        let report = delete_sites(&store, &["a".into()], &controller, PostSyncAction::Reload).await;

        assert!(report.removals[0].available_removed);
        assert_eq!(controller.calls(), ["validate", "reload"]);
    }
}
