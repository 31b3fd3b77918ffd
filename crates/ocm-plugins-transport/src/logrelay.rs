//! Relays a running plugin's stderr into the host's `tracing` output, one
//! line per log event, tagged with the plugin's id.
//!
//! Spawned only after the plugin's health probe succeeds, and lives under the
//! host's base scope (joined at host shutdown) rather than any single
//! request's cancellation scope — a plugin keeps logging between requests.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStderr;
use tokio::task::JoinHandle;
use tracing::{info_span, warn};

/// Spawns a detached task that reads `stderr` line-by-line and logs each line
/// at `info` level under a span carrying `plugin_id`.
pub fn spawn(plugin_id: String, stderr: ChildStderr) -> JoinHandle<()> {
    tokio::spawn(async move {
        let span = info_span!("plugin_log", plugin_id = %plugin_id);
        let _enter = span.enter();
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => tracing::info!(target: "plugin", "{line}"),
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "error reading plugin stderr");
                    break;
                }
            }
        }
    })
}
