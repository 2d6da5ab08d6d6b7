use std::time::Duration;

use actix_web::dev::ServerHandle;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 等待关闭信号（Ctrl+C，Unix 下还包括 SIGTERM）
pub async fn listen_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    res = signal::ctrl_c() => log_ctrl_c(res),
                    _ = term.recv() => info!("SIGTERM received, shutting down..."),
                }
                return;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {}", e),
        }
    }

    log_ctrl_c(signal::ctrl_c().await);
}

fn log_ctrl_c(res: std::io::Result<()>) {
    match res {
        Ok(()) => info!("Shutdown signal received, stopping listeners..."),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}

/// Gracefully stop every listener, bounded by `limit`.
pub async fn stop_servers(handles: &[ServerHandle], limit: Duration) {
    let stops = futures_util::future::join_all(handles.iter().map(|h| h.stop(true)));

    match timeout(limit, stops).await {
        Ok(_) => info!("All listeners stopped"),
        Err(_) => error!(
            "Listeners did not stop within {} seconds",
            limit.as_secs()
        ),
    }
}
