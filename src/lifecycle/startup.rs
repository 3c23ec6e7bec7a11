//! Startup preconditions.
//!
//! # Responsibilities
//! - Load the project list and template set
//! - Refuse to run with zero valid projects
//! - Probe write access to both configuration directories
//!
//! # Design Decisions
//! - Fail fast: every error here is fatal for the run
//! - Privilege is checked by trying, not by comparing uids

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::project::{filter_valid, ProjectBatch};
use crate::store::ConfigStore;
use crate::template::TemplateCatalog;

/// Fatal problems before any project is processed.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain a list of projects", path.display())]
    NotAList { path: PathBuf },

    #[error("no valid projects to configure")]
    NoValidProjects,

    #[error("no templates defined in {}", path.display())]
    NoTemplates { path: PathBuf },

    #[error("directory {} does not exist", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("insufficient privilege to modify {}: {source}", path.display())]
    InsufficientPrivilege {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn read(path: &Path) -> Result<String, StartupError> {
    let content = fs::read_to_string(path).map_err(|source| StartupError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = ?path, "Loaded input file");
    Ok(content)
}

/// Load and validate the project list.
pub fn load_projects(path: &Path) -> Result<ProjectBatch, StartupError> {
    let content = read(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|source| StartupError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(raw) = value else {
        return Err(StartupError::NotAList {
            path: path.to_path_buf(),
        });
    };

    let batch = filter_valid(&raw);
    if batch.valid.is_empty() {
        return Err(StartupError::NoValidProjects);
    }
    Ok(batch)
}

/// Load the template set.
pub fn load_templates(path: &Path) -> Result<TemplateCatalog, StartupError> {
    let content = read(path)?;
    let catalog = TemplateCatalog::from_json_str(&content).map_err(|source| StartupError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if catalog.is_empty() {
        return Err(StartupError::NoTemplates {
            path: path.to_path_buf(),
        });
    }
    Ok(catalog)
}

/// Check that both directories exist and accept new files.
pub fn check_privileges(store: &ConfigStore) -> Result<(), StartupError> {
    for dir in [store.available_dir(), store.enabled_dir()] {
        if !dir.is_dir() {
            return Err(StartupError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
        tempfile::tempfile_in(dir).map_err(|source| StartupError::InsufficientPrivilege {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_projects_filters_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "projects.json",
            r#"[{"name": "a", "domain": "a.com", "port": 80}, {"name": "b", "port": 0}]"#,
        );
        let batch = load_projects(&path).unwrap();
        assert_eq!(batch.valid.len(), 1);
        assert_eq!(batch.rejected.len(), 1);
    }

    #[test]
    fn test_zero_valid_projects_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "projects.json",
            r#"[{"name": "a", "domain": "a.com", "port": 99999}]"#,
        );
        assert!(matches!(load_projects(&path), Err(StartupError::NoValidProjects)));

        let path = write(dir.path(), "empty.json", "[]");
        assert!(matches!(load_projects(&path), Err(StartupError::NoValidProjects)));
    }

    #[test]
    fn test_project_file_shape_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "object.json", r#"{"name": "a"}"#);
        assert!(matches!(load_projects(&path), Err(StartupError::NotAList { .. })));

        let path = write(dir.path(), "broken.json", "[{");
        assert!(matches!(load_projects(&path), Err(StartupError::Parse { .. })));

        assert!(matches!(
            load_projects(&dir.path().join("absent.json")),
            Err(StartupError::Read { .. })
        ));
    }

    #[test]
    fn test_templates_must_define_something() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.json", r#"{"other": {"template": "x"}}"#);
        assert!(matches!(load_templates(&path), Err(StartupError::NoTemplates { .. })));

        let path = write(dir.path(), "ok.json", r#"{"rootdomain": {"template": "x"}}"#);
        assert!(load_templates(&path).is_ok());
    }

    #[test]
    fn test_privilege_probe() {
        let root = tempfile::tempdir().unwrap();
        let available = root.path().join("available");
        fs::create_dir(&available).unwrap();

        let store = ConfigStore::new(&available, root.path().join("enabled"));
        assert!(matches!(check_privileges(&store), Err(StartupError::MissingDirectory { .. })));

        fs::create_dir(root.path().join("enabled")).unwrap();
        check_privileges(&store).unwrap();
        assert_eq!(fs::read_dir(&available).unwrap().count(), 0);
    }
}
