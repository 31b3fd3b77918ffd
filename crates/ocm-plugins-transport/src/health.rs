//! Polls a freshly spawned plugin's `/healthz` endpoint until it answers or a
//! startup deadline elapses.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::client::PluginClient;
use crate::error::{TransportError, TransportResult};

/// Default total time budget allowed for a plugin to become healthy.
pub const DEFAULT_START_DEADLINE: Duration = Duration::from_secs(20);

/// Polls `client`'s `/healthz` endpoint with exponential backoff (starting at
/// 25ms, doubling, capped at 500ms) until it returns success or `deadline`
/// elapses.
pub async fn wait_for_health(client: &PluginClient, plugin_id: &str, deadline: Duration) -> TransportResult<()> {
    let start = Instant::now();
    let mut backoff = Duration::from_millis(25);
    const MAX_BACKOFF: Duration = Duration::from_millis(500);

    loop {
        match client.get_raw("/healthz").await {
            Ok(_) => {
                debug!(plugin_id, elapsed_ms = %start.elapsed().as_millis(), "plugin became healthy");
                return Ok(());
            }
            Err(_) if start.elapsed() < deadline => {
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(_) => {
                return Err(TransportError::StartTimeout {
                    plugin_id: plugin_id.to_string(),
                    deadline_secs: deadline.as_secs(),
                });
            }
        }
    }
}
