//! Spawns plugin child processes for both invocation shapes: the one-shot
//! `capabilities` probe and the long-running `--config <json>` server.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::{TransportError, TransportResult};

/// Runs `plugin_path capabilities` to completion and returns its stdout,
/// expected to be the plugin's manifest JSON.
pub async fn run_capabilities(plugin_id: &str, plugin_path: &Path) -> TransportResult<Vec<u8>> {
    let output = Command::new(plugin_path)
        .arg("capabilities")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| TransportError::SpawnFailed {
            plugin_id: plugin_id.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(TransportError::SpawnFailed {
            plugin_id: plugin_id.to_string(),
            reason: format!(
                "capabilities exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ),
        });
    }

    Ok(output.stdout)
}

/// A spawned, long-running plugin server process. Dropping this without
/// calling [`PluginProcess::shutdown`] leaves the child running; callers
/// should always route through `shutdown` during host teardown.
pub struct PluginProcess {
    plugin_id: String,
    child: Child,
    /// Owned so `logrelay` can take it; `None` once taken.
    pub stderr: Option<tokio::process::ChildStderr>,
}

impl PluginProcess {
    /// Spawns `plugin_path --config <config_json>`, passing the chosen
    /// endpoint's address via the config payload's `endpoint` field.
    pub fn spawn(plugin_id: &str, plugin_path: &Path, endpoint: &Endpoint, config_json: &str) -> TransportResult<Self> {
        let mut cmd = Command::new(plugin_path);
        cmd.arg("--config")
            .arg(config_json)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(path) = endpoint.socket_path() {
            cmd.env("OCM_PLUGIN_SOCKET", path);
        }

        let mut child = cmd.spawn().map_err(|e| TransportError::SpawnFailed {
            plugin_id: plugin_id.to_string(),
            reason: e.to_string(),
        })?;

        let stderr = child.stderr.take();

        debug!(plugin_id, pid = ?child.id(), "spawned plugin process");

        Ok(Self {
            plugin_id: plugin_id.to_string(),
            child,
            stderr,
        })
    }

    /// Sends SIGINT to the child and waits for it to exit, per the graceful
    /// shutdown contract plugins are expected to honor.
    pub async fn shutdown(mut self) -> TransportResult<()> {
        if let Some(pid) = self.child.id() {
            let nix_pid = nix::unistd::Pid::from_raw(pid as i32);
            if let Err(e) = nix::sys::signal::kill(nix_pid, nix::sys::signal::Signal::SIGINT) {
                debug!(plugin_id = %self.plugin_id, error = %e, "SIGINT delivery failed, process may have already exited");
            }
        }

        match tokio::time::timeout(std::time::Duration::from_secs(5), self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!(plugin_id = %self.plugin_id, %status, "plugin process exited");
                Ok(())
            }
            Ok(Err(e)) => Err(TransportError::Io(e.to_string())),
            Err(_) => {
                let _ = self.child.start_kill();
                let _ = self.child.wait().await;
                Ok(())
            }
        }
    }
}

/// Reads the entirety of `stderr` and returns it, used by the `capabilities`
/// one-shot path where there's no running server to relay logs from.
pub async fn drain_stderr(mut stderr: tokio::process::ChildStderr) -> String {
    let mut buf = String::new();
    let mut reader = BufReader::new(&mut stderr);
    let _ = reader.read_to_string(&mut buf).await;
    buf
}
