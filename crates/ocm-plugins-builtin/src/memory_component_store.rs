//! An in-process component-version store backed by an in-memory map.
//!
//! Useful both as the reference builtin and as a fixture for
//! tests that need a `ComponentVersionStore` without spawning a real plugin
//! process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ocm_plugins_adapters::{AdapterError, AdapterResult, ComponentVersionStore};
use ocm_plugins_core::{Identity, Type};
use ocm_plugins_transport::Location;
use parking_lot::RwLock;
use serde_json::Value;

use crate::module::BuiltinModule;

/// A component-version store holding descriptors entirely in memory.
#[derive(Default)]
pub struct MemoryComponentVersionStore {
    descriptors: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryComponentVersionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a descriptor directly, bypassing the `add` round trip. Useful
    /// in tests.
    pub fn seed(&self, name: &str, version: &str, descriptor: Value) {
        self.descriptors.write().insert((name.to_string(), version.to_string()), descriptor);
    }
}

#[async_trait]
impl ComponentVersionStore for MemoryComponentVersionStore {
    async fn get(&self, _repository: &Value, name: &str, version: &str) -> AdapterResult<Value> {
        self.descriptors
            .read()
            .get(&(name.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| AdapterError::MalformedResponse(format!("no descriptor for {name}:{version}")))
    }

    async fn add(&self, _repository: &Value, descriptor: &Value) -> AdapterResult<()> {
        let name = descriptor
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::MalformedResponse("descriptor missing 'name'".to_string()))?
            .to_string();
        let version = descriptor
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::MalformedResponse("descriptor missing 'version'".to_string()))?
            .to_string();
        self.descriptors.write().insert((name, version), descriptor.clone());
        Ok(())
    }

    async fn download_local_resource(
        &self,
        _repository: &Value,
        _name: &str,
        _version: &str,
        _identity: &Identity,
        target: &Location,
    ) -> AdapterResult<()> {
        if let Location::LocalFile { path } = target {
            std::fs::write(path, b"{}")?;
        }
        Ok(())
    }

    async fn upload_local_resource(
        &self,
        _repository: &Value,
        _name: &str,
        _version: &str,
        _resource: &Value,
        _resource_location: &Location,
    ) -> AdapterResult<()> {
        Ok(())
    }
}

/// Registers [`MemoryComponentVersionStore`] under the `oci/v1` type, with
/// `oci` as an unversioned alias.
pub struct OciMemoryModule(pub Arc<MemoryComponentVersionStore>);

impl BuiltinModule<dyn ComponentVersionStore> for OciMemoryModule {
    fn canonical_type(&self) -> Type {
        Type::with_version("oci", "v1")
    }

    fn aliases(&self) -> Vec<Type> {
        vec![Type::new("oci")]
    }

    fn implementation(&self) -> Arc<dyn ComponentVersionStore> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let store = MemoryComponentVersionStore::new();
        store
            .add(&json!({}), &json!({"name": "foo", "version": "1.0", "resources": []}))
            .await
            .unwrap();
        let got = store.get(&json!({}), "foo", "1.0").await.unwrap();
        assert_eq!(got["name"], "foo");
    }

    #[tokio::test]
    async fn get_missing_fails() {
        let store = MemoryComponentVersionStore::new();
        assert!(store.get(&json!({}), "missing", "1.0").await.is_err());
    }
}
