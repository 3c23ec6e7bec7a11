//! Per-project outcomes and the batch aggregate.

use serde::Serialize;
use uuid::Uuid;

use crate::project::Rejected;
use crate::server::ServerOutcome;
use crate::store::ConfigEntry;

/// What happened to one project during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Entry written and activated.
    Created,
    /// Entry written, activation link could not be created.
    CreatedNotActivated { reason: String },
    /// Dry run: entry would be written and activated.
    WouldCreate,
    /// One or both facets already on disk; nothing touched.
    SkippedExisting { entry: ConfigEntry },
    /// Descriptor rejected by validation.
    SkippedInvalid { reason: String },
    /// Rendering or writing failed.
    Failed { reason: String },
}

impl SyncOutcome {
    /// Outcomes that modified the configuration directories.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::CreatedNotActivated { .. })
    }
}

/// Outcome for one named project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOutcome {
    /// Project name, or `#<index>` for rejected descriptors without one.
    pub name: String,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Aggregate over one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub outcomes: Vec<ProjectOutcome>,
    pub changes_made: bool,
}

impl SyncResult {
    pub fn record(&mut self, name: impl Into<String>, outcome: SyncOutcome) {
        self.changes_made |= outcome.is_change();
        self.outcomes.push(ProjectOutcome {
            name: name.into(),
            outcome,
        });
    }

    /// Record validator rejections as `SkippedInvalid`, each at its
    /// original input position.
    ///
    /// Expects `self` to hold the valid projects' outcomes in input order and
    /// `rejected` to be sorted by index, as `filter_valid` produces them.
    pub fn record_rejected(&mut self, rejected: &[Rejected]) {
        for r in rejected {
            let name = r.name.clone().unwrap_or_else(|| format!("#{}", r.index));
            let at = r.index.min(self.outcomes.len());
            self.outcomes.insert(
                at,
                ProjectOutcome {
                    name,
                    outcome: SyncOutcome::SkippedInvalid {
                        reason: r.error.to_string(),
                    },
                },
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&SyncOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.outcome)
    }

    pub fn summary(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for o in &self.outcomes {
            match o.outcome {
                SyncOutcome::Created => summary.created += 1,
                SyncOutcome::CreatedNotActivated { .. } => summary.created_not_activated += 1,
                SyncOutcome::WouldCreate => summary.would_create += 1,
                SyncOutcome::SkippedExisting { .. } => summary.skipped_existing += 1,
                SyncOutcome::SkippedInvalid { .. } => summary.skipped_invalid += 1,
                SyncOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: usize,
    pub created_not_activated: usize,
    pub would_create: usize,
    pub skipped_existing: usize,
    pub skipped_invalid: usize,
    pub failed: usize,
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} created but not activated, {} already present, {} invalid, {} failed",
            self.created,
            self.created_not_activated,
            self.skipped_existing,
            self.skipped_invalid,
            self.failed
        )?;
        if self.would_create > 0 {
            write!(f, ", {} would be created", self.would_create)?;
        }
        Ok(())
    }
}

/// A full run: batch result plus the server step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub result: SyncResult,
    pub server: ServerOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectError;

    #[test]
    fn test_changes_tracked_by_outcome() {
        let mut result = SyncResult::default();
        let entry = ConfigEntry { defined: true, enabled: true };
        result.record("a", SyncOutcome::SkippedExisting { entry });
        result.record("b", SyncOutcome::Failed { reason: "disk full".into() });
        assert!(!result.changes_made);

        result.record("c", SyncOutcome::CreatedNotActivated { reason: "EEXIST".into() });
        assert!(result.changes_made);
    }

    #[test]
    fn test_rejected_without_name_uses_index() {
        let mut result = SyncResult::default();
        result.record_rejected(&[Rejected {
            index: 3,
            name: None,
            error: ProjectError::MissingField("name"),
        }]);
        assert_eq!(
            result.get("#3"),
            Some(&SyncOutcome::SkippedInvalid {
                reason: "missing required key 'name'".into()
            })
        );
        assert_eq!(result.summary().skipped_invalid, 1);
    }

    #[test]
    fn test_summary_display() {
        let summary = SyncSummary {
            created: 2,
            skipped_existing: 1,
            ..SyncSummary::default()
        };
        assert_eq!(
            summary.to_string(),
            "2 created, 0 created but not activated, 1 already present, 0 invalid, 0 failed"
        );
    }
}
