//! Web server control.
//!
//! # State Machine
//! ```text
//! NoChanges   → done (server untouched)
//! ChangesMade → Validate ─┬─ Valid   → Reload | Restart → done
//!                         └─ Invalid → report           → done (not reloaded)
//! ```
//!
//! # Design Decisions
//! - Validation always precedes reload; a broken render never goes live
//! - Reload/restart failures are reported, not retried
//! - Every external command has a deadline

pub mod command;

use serde::Serialize;

use crate::config::PostSyncAction;

pub use command::{run_command, CommandController, CommandError};

/// External operations on the running web server.
#[allow(async_fn_in_trait)]
pub trait ServerController {
    /// Test the configuration set. `Ok` carries stdout, `Err` the combined
    /// diagnostic output.
    async fn validate(&self) -> Result<String, String>;

    async fn reload(&self) -> Result<(), String>;

    async fn restart(&self) -> Result<(), String>;
}

/// Result of the post-change server step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ServerOutcome {
    /// Nothing changed, server not contacted.
    NoChanges,
    /// Configuration valid and the action succeeded.
    Applied { action: PostSyncAction },
    /// Configuration valid but the action failed.
    ActionFailed { action: PostSyncAction, reason: String },
    /// Configuration invalid, server left as it was.
    ValidationFailed { diagnostics: String },
}

impl ServerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ActionFailed { .. } | Self::ValidationFailed { .. })
    }
}

/// Validate and, only when valid, reload or restart.
pub async fn apply_changes<C: ServerController>(
    controller: &C,
    changes_made: bool,
    action: PostSyncAction,
) -> ServerOutcome {
    if !changes_made {
        tracing::info!("No changes made to server configuration, skipping reload");
        return ServerOutcome::NoChanges;
    }

    match controller.validate().await {
        Ok(stdout) => {
            tracing::info!("Configuration test successful\n{}", stdout.trim_end());
        }
        Err(diagnostics) => {
            tracing::error!("Configuration test failed, not reloading:\n{}", diagnostics);
            return ServerOutcome::ValidationFailed { diagnostics };
        }
    }

    let result = match action {
        PostSyncAction::Reload => controller.reload().await,
        PostSyncAction::Restart => controller.restart().await,
    };

    match result {
        Ok(()) => ServerOutcome::Applied { action },
        Err(reason) => ServerOutcome::ActionFailed { action, reason },
    }
}
