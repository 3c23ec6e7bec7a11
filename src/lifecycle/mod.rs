//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load inputs → Validate projects → Probe directory privileges
//!
//! Locking (lock.rs):
//!     Optional lock file held for the whole mutating run
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → stop watch mode between runs
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and exits non-zero
//! - The lock is released on drop, including on early return

pub mod lock;
pub mod signals;
pub mod startup;

pub use lock::{LockError, RunLock};
pub use startup::{check_privileges, load_projects, load_templates, StartupError};
