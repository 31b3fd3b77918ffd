//! Shared plumbing every `Plugin*Adapter` is built from: a client bound to
//! the plugin's running server, the type this adapter instance handles, and
//! the schema validator consulted before every request.

use std::sync::Arc;

use ocm_plugins_core::Type;
use ocm_plugins_registry::StartedPlugin;
use ocm_plugins_schema::SchemaValidator;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AdapterResult;

/// Common state wrapped by every external-plugin adapter.
pub struct AdapterBase {
    /// The plugin's running server, reached over its IPC transport.
    pub started: Arc<StartedPlugin>,
    /// Schema validator carrying this plugin's declared schemas.
    pub schema: Arc<SchemaValidator>,
    /// Plugin id, used in schema lookups and diagnostics.
    pub plugin_id: String,
    /// The domain type this adapter instance was constructed for.
    pub ty: Type,
}

impl AdapterBase {
    /// Creates a new adapter base.
    pub fn new(started: Arc<StartedPlugin>, schema: Arc<SchemaValidator>, plugin_id: impl Into<String>, ty: Type) -> Self {
        Self {
            started,
            schema,
            plugin_id: plugin_id.into(),
            ty,
        }
    }

    /// Validates `schema_value` — the sub-value of `body` matching the
    /// prototype the plugin reflected its schema from — against this
    /// plugin's declared schema for `self.ty`, then posts the full `body` to
    /// `path`, decoding the JSON response as `R`.
    ///
    /// `schema_value` is deliberately a narrower value than `body`: the
    /// manifest's declared schema describes one registered prototype (e.g.
    /// the descriptor a component-version plugin reflected), not the whole
    /// transport envelope `body` carries alongside it.
    pub async fn validated_post<B: Serialize, R: DeserializeOwned>(&self, path: &str, schema_value: &Value, body: &B) -> AdapterResult<R> {
        self.schema.validate(&self.plugin_id, &self.ty, schema_value)?;
        self.started
            .client
            .post_json(path, body, None, None)
            .await
            .map_err(Into::into)
    }

    /// Issues a GET with query parameters and repository/credential headers.
    /// Validates `repository`, when present, against this plugin's declared
    /// schema for `self.ty` before issuing the request — `SchemaValidator`
    /// itself skips when no schema was declared or the value is a bare
    /// string (the identifier-pass carve-out).
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)], repository: Option<&Value>) -> AdapterResult<R> {
        if let Some(value) = repository {
            self.schema.validate(&self.plugin_id, &self.ty, value)?;
        }
        self.started.client.get_json(path, query, repository, None).await.map_err(Into::into)
    }
}
