//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! site-sync.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SyncConfig (validated, immutable)
//!     → CLI flags override individual fields
//!
//! In watch mode:
//!     watcher.rs detects a change to the project or template file
//!     → a sync run is triggered with freshly loaded inputs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so a missing file means nginx on Debian
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{ObservabilityConfig, PathsConfig, PostSyncAction, ServerConfig, SyncConfig};
