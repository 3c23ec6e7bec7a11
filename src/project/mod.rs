//! Project descriptors.
//!
//! # Data Flow
//! ```text
//! projects.json (array of raw objects)
//!     → validator.rs (ordered rule checks, per-project rejection)
//!     → ProjectDescriptor (typed, immutable)
//!     → sync engine
//! ```

pub mod descriptor;
pub mod validator;

pub use descriptor::{is_safe_name, ProjectDescriptor};
pub use validator::{filter_valid, is_valid, validate, ProjectBatch, ProjectError, Rejected};
