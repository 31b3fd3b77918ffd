//! The `--config <json>` payload the host passes when starting a plugin's
//! long-running server.

use ocm_plugins_core::Type;
use serde::{Deserialize, Serialize};

/// Transport kind selected by the host for this plugin instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Serve over a Unix domain socket.
    Unix,
    /// Serve over TCP.
    Tcp,
}

/// Parsed form of the JSON object passed via `--config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeConfig {
    /// Host-assigned plugin instance id, used to tag log output.
    pub id: String,
    /// Transport kind to serve on.
    #[serde(rename = "type")]
    pub transport: TransportKind,
    /// Capability kind this plugin instance was started for.
    pub plugin_type: Type,
    /// Socket path (for `unix`) or `host:port` (for `tcp`) to bind.
    pub location: String,
    /// Optional idle timeout in seconds before the plugin may self-exit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<u64>,
    /// Config types the host expects this instance to honor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_types: Vec<Type>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unix_config() {
        let json = r#"{"id":"p1","type":"unix","pluginType":"componentVersionRepository/v1","location":"/tmp/p1.socket"}"#;
        let cfg: ServeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.transport, TransportKind::Unix);
        assert_eq!(cfg.location, "/tmp/p1.socket");
    }
}
