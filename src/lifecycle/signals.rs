//! OS signal handling.

/// Wait for Ctrl+C.
///
/// If the handler cannot be installed the server keeps running; it then
/// has to be stopped externally.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
