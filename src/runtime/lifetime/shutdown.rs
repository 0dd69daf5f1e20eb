use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C，监听失败时记录错误并立即返回
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
