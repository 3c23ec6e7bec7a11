//! Configuration synchronization.
//!
//! # Data Flow
//! ```text
//! ProjectBatch (valid + rejected)
//!     → engine.rs, per project:
//!         store.exists → skip if present
//!         catalog.render → store.write → store.activate
//!     → SyncResult { outcomes, changes_made }
//!     → server::apply_changes (validate, then reload)
//!     → SyncReport
//! ```

pub mod engine;
pub mod outcome;

pub use engine::SyncEngine;
pub use outcome::{ProjectOutcome, SyncOutcome, SyncReport, SyncResult, SyncSummary};
