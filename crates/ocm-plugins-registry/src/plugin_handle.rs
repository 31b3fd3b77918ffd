//! A declared external plugin, started lazily on first use.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ocm_plugins_transport::{DEFAULT_START_DEADLINE, Endpoint, PluginClient, PluginProcess, TransportKind, endpoint_for, logrelay, wait_for_health};
use tokio::sync::OnceCell;

use crate::error::RegistryResult;

/// Everything known about an external plugin at discovery time, before its
/// process has ever been started.
#[derive(Debug, Clone)]
pub struct PluginRecord {
    /// Host-unique plugin identifier (the candidate's file name).
    pub id: String,
    /// Absolute path to the plugin binary.
    pub path: PathBuf,
}

/// A declared external plugin. Constructing the process and transport is
/// deferred to first use, guarded by an internal [`OnceCell`] so that
/// concurrent first callers race for the single construction and everyone
/// else awaits the same result ("concurrent first-start race").
pub struct PluginHandle {
    record: PluginRecord,
    started: OnceCell<Arc<StartedPlugin>>,
}

/// The live state of a started plugin: its process handle and a client bound
/// to its transport endpoint.
pub struct StartedPlugin {
    /// HTTP client bound to the plugin's endpoint.
    pub client: PluginClient,
    process: tokio::sync::Mutex<Option<PluginProcess>>,
}

impl PluginHandle {
    /// Creates a handle for a not-yet-started plugin.
    pub fn new(record: PluginRecord) -> Self {
        Self {
            record,
            started: OnceCell::new(),
        }
    }

    /// The plugin's id.
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Returns the started plugin, spawning the process and waiting for its
    /// health probe on the first call. Subsequent calls return the same
    /// instance without spawning again. `transport_kind` is decided once
    /// per host instance by the caller, not re-probed per plugin.
    pub async fn get_or_start(
        &self,
        transport_kind: TransportKind,
        config_json_builder: impl FnOnce(&Endpoint) -> String,
    ) -> RegistryResult<Arc<StartedPlugin>> {
        self.started
            .get_or_try_init(|| async {
                let endpoint = endpoint_for(&self.record.id, transport_kind).await?;
                let config_json = config_json_builder(&endpoint);
                let mut process = PluginProcess::spawn(&self.record.id, &self.record.path, &endpoint, &config_json)?;
                let client = PluginClient::new(&self.record.id, &endpoint);

                wait_for_health(&client, &self.record.id, DEFAULT_START_DEADLINE).await?;

                if let Some(stderr) = process.stderr.take() {
                    logrelay::spawn(self.record.id.clone(), stderr);
                }

                Ok(Arc::new(StartedPlugin {
                    client,
                    process: tokio::sync::Mutex::new(Some(process)),
                }))
            })
            .await
            .cloned()
    }

    /// Sends SIGINT to the plugin process if it was ever started, with a
    /// bounded wait for exit.
    pub async fn shutdown(&self, timeout: Duration) -> RegistryResult<()> {
        let Some(started) = self.started.get() else {
            return Ok(());
        };
        let mut guard = started.process.lock().await;
        if let Some(process) = guard.take() {
            let _ = tokio::time::timeout(timeout, process.shutdown()).await;
        }
        Ok(())
    }
}
