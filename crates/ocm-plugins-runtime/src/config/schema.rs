//! The host's own configuration shape.
//!
//! This is distinct from the *domain* config a plugin declares support for
//! (`supportedConfigTypes`): `OcmConfig` is what the host itself reads
//! from disk; `config_entries` are the typed payloads the Plugin Manager
//! filters by `supportedConfigTypes` when deciding whether a plugin may be
//! registered.

use std::path::PathBuf;

use ocm_plugins_core::Type;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration structure for the host.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OcmConfig {
    /// Host-wide settings.
    pub global: GlobalConfig,
    /// Typed configuration payloads available to plugins, matched against
    /// each plugin's `supportedConfigTypes`.
    pub config_entries: Vec<ConfigEntry>,
    /// Component-version fallback routing: composes several registered
    /// component-version types into one priority-ordered resolver chain,
    /// per name prefix. Empty by default — the host serves each type
    /// directly through its own registry entry unless this is configured.
    pub component_version_fallback: Vec<FallbackRouteConfig>,
}

/// Host-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Minimum log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub log_level: String,
    /// Directory the Plugin Manager walks for plugin candidates.
    pub plugin_dir: Option<PathBuf>,
    /// Directory log files are rotated into. Stderr-only when absent.
    pub log_dir: Option<PathBuf>,
    /// Seconds to wait for a freshly started plugin's health probe before
    /// failing with `StartTimeout`.
    #[serde(default = "default_start_deadline_secs")]
    pub start_deadline_secs: u64,
    /// Seconds to wait for a plugin to exit after `SIGINT` during shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    /// Bounded worker pool size for fallback-repository list aggregation.
    #[serde(default = "default_fallback_concurrency")]
    pub fallback_concurrency: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            plugin_dir: None,
            log_dir: None,
            start_deadline_secs: default_start_deadline_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            fallback_concurrency: default_fallback_concurrency(),
        }
    }
}

fn default_start_deadline_secs() -> u64 {
    20
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

fn default_fallback_concurrency() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

/// One resolver in a component-version fallback chain: reads of a name
/// matching `prefix` try `ty`'s registered store, in descending `priority`
/// order, against `repository`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackRouteConfig {
    /// Component-name prefix this route applies to; empty matches every name.
    #[serde(default)]
    pub prefix: String,
    /// Higher priority is tried first.
    pub priority: i64,
    /// The registered component-version type this route resolves through.
    #[serde(rename = "type")]
    pub ty: Type,
    /// The repository spec passed to that type's store on every call.
    pub repository: Value,
}

/// One typed configuration payload the host makes available to plugins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// The config type this entry satisfies, e.g. `credentials/v1`.
    #[serde(rename = "type")]
    pub ty: Type,
    /// The entry's body, merged flat alongside `type` on the wire.
    #[serde(flatten)]
    pub value: Value,
}
