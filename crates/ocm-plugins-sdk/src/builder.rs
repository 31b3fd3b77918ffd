//! Accumulates capability routes and manifest entries for a plugin binary.

use axum::Router;
use axum::routing::get;
use ocm_plugins_core::Type;
use schemars::JsonSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::error::{SdkError, SdkResult};
use crate::manifest::{CapabilitySpec, PluginSpec, SupportedType};

async fn healthz() -> &'static str {
    "ok"
}

/// Accumulates a plugin's axum routes and manifest entries. Built up via
/// repeated [`EndpointBuilder::register`] calls, then consumed by
/// [`crate::run`] to serve the `capabilities`/`--config` CLI contract.
pub struct EndpointBuilder {
    router: Router,
    capability_specs: Vec<CapabilitySpec>,
    supported_config_types: Vec<Type>,
    registered_types: Vec<Type>,
}

impl EndpointBuilder {
    /// Creates an empty builder with only `/healthz` wired.
    pub fn new() -> Self {
        Self {
            router: Router::new().route("/healthz", get(healthz)),
            capability_specs: Vec::new(),
            supported_config_types: Vec::new(),
            registered_types: Vec::new(),
        }
    }

    /// Registers one capability's routes and its manifest entry.
    ///
    /// `kind` is the capability kind (e.g. `componentVersionRepository/v1`).
    /// `ty` is the domain type this handler supports (e.g. `oci/v1`).
    /// `routes` is the set of axum routes this capability serves at its
    /// fixed, capability-defined paths. `P` is the request or descriptor
    /// prototype the JSON Schema is reflected from.
    pub fn register<P: JsonSchema>(mut self, kind: &str, ty: Type, routes: Router) -> SdkResult<Self> {
        if self.registered_types.contains(&ty) {
            return Err(SdkError::DuplicateRegistration(ty.to_string()));
        }

        let schema = schema_for!(P);
        let json_schema: Value = serde_json::to_value(&schema).map_err(|e| SdkError::ManifestEncoding(e.to_string()))?;

        self.capability_specs.push(CapabilitySpec {
            kind: Type::from(kind),
            supported_types: vec![SupportedType {
                ty: ty.clone(),
                json_schema: Some(json_schema),
            }],
            extra: Value::Object(Default::default()),
        });
        self.registered_types.push(ty);
        self.router = self.router.merge(routes);
        Ok(self)
    }

    /// Declares a config type this plugin requires to be present in the
    /// host's active configuration.
    pub fn supports_config_type(mut self, ty: Type) -> Self {
        self.supported_config_types.push(ty);
        self
    }

    /// Builds the wire manifest from everything registered so far.
    pub fn manifest(&self) -> SdkResult<PluginSpec> {
        let capability_specs = self
            .capability_specs
            .iter()
            .map(CapabilitySpec::to_raw)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PluginSpec {
            capability_specs,
            supported_config_types: self.supported_config_types.clone(),
        })
    }

    /// Consumes the builder, yielding the accumulated axum router.
    pub fn into_router(self) -> Router {
        self.router
    }
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self::new()
    }
}
