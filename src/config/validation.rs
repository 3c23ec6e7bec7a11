//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, commands non-empty)
//! - Detect conflicting directories
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SyncConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::SyncConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("server.{0} must name a program")]
    EmptyCommand(&'static str),

    #[error("server.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("paths.available_dir and paths.enabled_dir must differ")]
    SameDirectories,

    #[error("paths.{0} must not be empty")]
    EmptyPath(&'static str),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &SyncConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let commands = [
        ("test_command", &config.server.test_command),
        ("reload_command", &config.server.reload_command),
        ("restart_command", &config.server.restart_command),
    ];
    for (field, argv) in commands {
        if argv.first().map_or(true, |program| program.trim().is_empty()) {
            errors.push(ValidationError::EmptyCommand(field));
        }
    }

    if config.server.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let paths = [
        ("available_dir", &config.paths.available_dir),
        ("enabled_dir", &config.paths.enabled_dir),
        ("projects_file", &config.paths.projects_file),
        ("templates_file", &config.paths.templates_file),
    ];
    for (field, path) in paths {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath(field));
        }
    }

    if config.paths.available_dir == config.paths.enabled_dir {
        errors.push(ValidationError::SameDirectories);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
