//! OS signal handling for watch mode.

use tokio::signal::unix::{signal, SignalKind};

/// Resolve when SIGINT or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c => tracing::info!("Received SIGINT"),
                _ = term.recv() => tracing::info!("Received SIGTERM"),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not install SIGTERM handler");
            let _ = ctrl_c.await;
            tracing::info!("Received SIGINT");
        }
    }
}
