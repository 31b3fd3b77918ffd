//! Per-capability-kind plugin registries.
//!
//! Each capability kind (component-version store, resource store, credential
//! repository, input, digest processor, signing, blob transformer, lister)
//! gets its own [`Registry`] instance, generic over the narrow domain trait
//! that capability exposes to callers (defined in `ocm-plugins-adapters`).
//! A [`Registry`] maps a [`ocm_plugins_core::Type`] to exactly one handler —
//! builtin or external — and lazily starts external plugins on first use.

pub mod error;
pub mod fallback;
pub mod plugin_handle;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use fallback::{ComponentVersionResolver, FallbackRepository};
pub use plugin_handle::{PluginHandle, PluginRecord, StartedPlugin};
pub use registry::{AdapterFactory, Registry};

#[cfg(test)]
mod tests {
    use super::*;
    use ocm_plugins_core::Type;
    use std::sync::Arc;

    #[async_trait::async_trait]
    trait Greeter: Send + Sync {
        async fn greet(&self) -> String;
    }

    struct StaticGreeter(String);

    #[async_trait::async_trait]
    impl Greeter for StaticGreeter {
        async fn greet(&self) -> String {
            self.0.clone()
        }
    }

    fn registry() -> Registry<dyn Greeter> {
        Registry::new(
            Arc::new(|_started, _plugin_id, _ty| Box::pin(async move { unreachable!("builtins-only test never constructs an external adapter") })),
            |_id, _endpoint| "{}".to_string(),
            Arc::new(tokio::sync::OnceCell::new()),
        )
    }

    #[tokio::test]
    async fn builtin_short_circuits_without_starting_a_process() {
        let reg = registry();
        reg.add_builtin(Type::with_version("oci", "v1"), Arc::new(StaticGreeter("hi".into())));
        let g = reg.get(&Type::with_version("oci", "v1")).await.unwrap();
        assert_eq!(g.greet().await, "hi");
    }

    #[tokio::test]
    async fn unknown_type_is_not_found() {
        let reg = registry();
        let err = reg.get(&Type::with_version("missing", "v1")).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn duplicate_type_registration_fails() {
        let reg = registry();
        let record = |id: &str| PluginRecord {
            id: id.to_string(),
            path: std::path::PathBuf::from("/bin/true"),
        };
        reg.add_plugin(record("p1"), &[Type::with_version("oci", "v1")]).unwrap();
        let err = reg.add_plugin(record("p2"), &[Type::with_version("oci", "v1")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTypeRegistered { .. }));
    }
}
