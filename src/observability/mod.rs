//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (site, kind, path)
//!     → one `sync` span per run, carrying a run id
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
