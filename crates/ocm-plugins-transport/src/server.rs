//! Serves a capability `axum::Router` over either a TCP or Unix domain socket
//! listener, shutting down gracefully when its `CancellationToken` fires.

use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::endpoint::Endpoint;
use crate::error::TransportResult;

/// Serves `router` on `endpoint` until `shutdown` is cancelled. Runs the
/// accept loop to completion on the caller's task; spawn this in its own
/// `tokio::task` to serve in the background.
pub async fn serve(endpoint: Endpoint, router: Router, shutdown: CancellationToken) -> TransportResult<()> {
    match endpoint {
        Endpoint::Tcp(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "plugin server listening on tcp");
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
                .map_err(|e| crate::error::TransportError::Io(e.to_string()))?;
        }
        Endpoint::Uds(path) => {
            if path.exists() {
                let _ = std::fs::remove_file(&path);
            }
            let listener = tokio::net::UnixListener::bind(&path)?;
            info!(path = %path.display(), "plugin server listening on uds");
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            let _ = std::fs::remove_file(&path);
            if let Err(e) = result {
                error!(error = %e, "plugin server error");
                return Err(crate::error::TransportError::Io(e.to_string()));
            }
        }
    }
    Ok(())
}
