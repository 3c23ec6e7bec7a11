//! Idempotent creation across a batch of projects.
//!
//! # Responsibilities
//! - Skip any project with an entry already on disk (never overwrite)
//! - Render, write and activate the rest, one project at a time
//! - Track whether anything changed and hand off to the server step
//!
//! # Design Decisions
//! - Every per-project failure becomes an outcome; the loop never aborts
//! - Activation is best-effort after a successful write and surfaces as
//!   `CreatedNotActivated`, which still counts as a change
//! - Each run executes inside a span carrying its run id

use tracing::Instrument;
use uuid::Uuid;

use crate::config::PostSyncAction;
use crate::project::{ProjectBatch, ProjectDescriptor};
use crate::server::{apply_changes, ServerController, ServerOutcome};
use crate::store::ConfigStore;
use crate::sync::outcome::{SyncOutcome, SyncReport, SyncResult};
use crate::template::TemplateCatalog;

/// Drives site creation against a `ConfigStore`.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    store: ConfigStore,
    dry_run: bool,
}

impl SyncEngine {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Render and report without touching the filesystem or the server.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Create entries for every project that has none yet.
    pub fn sync(
        &self,
        projects: &[ProjectDescriptor],
        templates: &TemplateCatalog,
    ) -> SyncResult {
        let mut result = SyncResult::default();
        for project in projects {
            let outcome = self.sync_project(project, templates);
            result.record(project.name.clone(), outcome);
        }
        result
    }

    fn sync_project(
        &self,
        project: &ProjectDescriptor,
        templates: &TemplateCatalog,
    ) -> SyncOutcome {
        let name = project.name.as_str();

        let entry = self.store.exists(name);
        if entry.is_present() {
            tracing::info!(
                site = %name,
                defined = entry.defined,
                enabled = entry.enabled,
                "Configuration already exists, skipping creation"
            );
            return SyncOutcome::SkippedExisting { entry };
        }

        let kind = project.kind();
        let rendered = match templates.render(kind, project) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    site = %name,
                    kind = %kind,
                    error = %e,
                    "Template rendering failed"
                );
                return SyncOutcome::Failed { reason: e.to_string() };
            }
        };

        if self.dry_run {
            tracing::info!(
                site = %name,
                kind = %kind,
                bytes = rendered.len(),
                "Would create configuration"
            );
            return SyncOutcome::WouldCreate;
        }

        if let Err(e) = self.store.write(name, &rendered) {
            if e.is_already_exists() {
                tracing::info!(
                    site = %name,
                    "Configuration appeared during sync, skipping creation"
                );
                return SyncOutcome::SkippedExisting {
                    entry: self.store.exists(name),
                };
            }
            tracing::error!(site = %name, error = %e, "Failed to write configuration");
            return SyncOutcome::Failed { reason: e.to_string() };
        }

        if let Err(e) = self.store.activate(name) {
            tracing::warn!(site = %name, error = %e, "Configuration written but not enabled");
            return SyncOutcome::CreatedNotActivated { reason: e.to_string() };
        }

        tracing::info!(site = %name, kind = %kind, "Configuration created and enabled");
        SyncOutcome::Created
    }

    /// Full workflow: sync the batch, then validate and reload on change.
    pub async fn run<C: ServerController>(
        &self,
        batch: &ProjectBatch,
        templates: &TemplateCatalog,
        controller: &C,
        action: PostSyncAction,
    ) -> SyncReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync", run_id = %run_id, dry_run = self.dry_run);

        let result = span.in_scope(|| {
            tracing::info!(
                projects = batch.valid.len(),
                rejected = batch.rejected.len(),
                "Starting sync"
            );
            let mut result = self.sync(&batch.valid, templates);
            result.record_rejected(&batch.rejected);
            result
        });

        let server = if self.dry_run {
            ServerOutcome::NoChanges
        } else {
            apply_changes(controller, result.changes_made, action)
                .instrument(span.clone())
                .await
        };

        span.in_scope(|| tracing::info!(summary = %result.summary(), "Sync finished"));

        SyncReport {
            run_id,
            result,
            server,
        }
    }
}
