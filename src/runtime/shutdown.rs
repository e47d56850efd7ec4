use actix_web::dev::ServerHandle;
use tokio::signal;
use tracing::{info, warn};

/// Resolve on Ctrl+C, or SIGTERM on Unix.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Wait for a shutdown signal, then stop the server gracefully.
///
/// In-flight requests are allowed to finish within the server's
/// shutdown timeout.
pub async fn listen_for_shutdown(handle: ServerHandle) {
    wait_for_signal().await;
    info!("Shutdown signal received, stopping server...");
    handle.stop(true).await;
    info!("Server stopped");
}
