//! The plugin manifest (`PluginSpec`) accumulated by the builder and printed
//! by the `capabilities` subcommand.

use ocm_plugins_core::{Raw, Type};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One capability's advertised shape: the supported type and, if the
/// capability is typed, the JSON Schema that requests of that type must
/// satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedType {
    /// The supported type, e.g. `oci/v1`.
    #[serde(rename = "type")]
    pub ty: Type,
    /// JSON Schema derived by reflection over the handler's prototype, if
    /// the capability registered one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<Value>,
}

/// A single capability declaration, destined to be wrapped as a [`Raw`]
/// envelope whose `type` is the capability kind (e.g.
/// `componentVersionRepository/v1`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySpec {
    /// The capability kind this spec advertises, e.g.
    /// `componentVersionRepository/v1`.
    #[serde(rename = "type")]
    pub kind: Type,
    /// Supported types and their schemas.
    pub supported_types: Vec<SupportedType>,
    /// Capability-kind-specific extra fields (e.g. credential plugins'
    /// supported consumer-identity types), merged into the same JSON object
    /// at serialization time.
    #[serde(flatten)]
    pub extra: Value,
}

impl CapabilitySpec {
    /// Wraps this spec as a canonicalized [`Raw`] envelope, as required by
    /// the wire manifest format.
    pub fn to_raw(&self) -> ocm_plugins_core::CoreResult<Raw> {
        let body = serde_json::to_value(self).map_err(|e| ocm_plugins_core::CoreError::Json(e.to_string()))?;
        Raw::new(self.kind.clone(), body)
    }
}

/// The manifest a plugin prints on `capabilities`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PluginSpec {
    /// Every capability this plugin advertises, each wrapped as a `Raw`
    /// envelope keyed by capability kind.
    pub capability_specs: Vec<Raw>,
    /// Config types this plugin needs present in the host's active
    /// configuration before it may be registered.
    pub supported_config_types: Vec<Type>,
}
