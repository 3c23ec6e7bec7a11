//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Resolve the log filter from environment, CLI and config
//!
//! # Design Decisions
//! - `RUST_LOG` wins over everything else
//! - A bare level such as `debug` applies to this crate only

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter directive for a bare level or pass a full directive through.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("site_sync={level},warn")
    }
}

/// Install the global subscriber.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(filter_directive(level))),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
