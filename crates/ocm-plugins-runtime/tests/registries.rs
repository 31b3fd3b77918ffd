use std::sync::Arc;
use std::time::Duration;

use ocm_plugins_adapters::ComponentVersionStore;
use ocm_plugins_builtin::{MemoryComponentVersionStore, OciMemoryModule, register_builtin};
use ocm_plugins_core::Type;
use ocm_plugins_registry::RegistryError;
use ocm_plugins_runtime::Registries;

#[tokio::test]
async fn builtin_resolves_without_starting_a_process() {
    let registries = Registries::new();
    let module = OciMemoryModule(Arc::new(MemoryComponentVersionStore::new()));
    register_builtin(&registries.component_version, &module);

    let store = registries.component_version.get(&Type::with_version("oci", "v1")).await.unwrap();
    store
        .add(&serde_json::json!({}), &serde_json::json!({"name": "component", "version": "1.0.0"}))
        .await
        .unwrap();
    let descriptor = store.get(&serde_json::json!({}), "component", "1.0.0").await.unwrap();
    assert_eq!(descriptor["version"], "1.0.0");

    // The alias resolves to the same builtin instance.
    let via_alias = registries.component_version.get(&Type::new("oci")).await.unwrap();
    let descriptor = via_alias.get(&serde_json::json!({}), "component", "1.0.0").await.unwrap();
    assert_eq!(descriptor["version"], "1.0.0");
}

#[tokio::test]
async fn unregistered_type_is_not_found() {
    let registries = Registries::new();
    let err = registries.resource.get(&Type::with_version("missing", "v1")).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn shutdown_with_no_external_plugins_returns_immediately() {
    let registries = Registries::new();
    registries.shutdown(Duration::from_secs(1)).await;
}
