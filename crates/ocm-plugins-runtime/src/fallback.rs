//! Wires the registered component-version stores named by
//! [`crate::config::FallbackRouteConfig`] into a [`FallbackRepository`].
//!
//! Each route names a registered component-version [`Type`] plus the
//! repository spec calls against it should carry; resolving the route looks
//! the type up in [`Registries::component_version`] exactly as any other
//! caller would, so builtins and external plugins compose the same way.

use std::sync::Arc;

use ocm_plugins_adapters::ComponentVersionStore;
use ocm_plugins_registry::{ComponentVersionResolver, FallbackRepository, RegistryResult};
use serde_json::Value;

use crate::config::FallbackRouteConfig;
use crate::error::ManagerResult;
use crate::registries::Registries;

/// Adapts a resolved [`ComponentVersionStore`] plus its fixed repository
/// spec to the narrower [`ComponentVersionResolver`] interface
/// `FallbackRepository` composes over.
///
/// `ComponentVersionStore` has no per-name version listing of its own —
/// only the `Lister` capability pages component names — so `list` here
/// returns an empty page rather than guessing at one. Routes that need
/// `list_all` to see more than a single version should pair this with a
/// repository whose `ComponentVersionStore::get` is itself
/// version-aggregating, or await a future capability method; this is a
/// known gap, not silently hidden.
struct StoreResolver {
    store: Arc<dyn ComponentVersionStore>,
    repository: Value,
}

#[async_trait::async_trait]
impl ComponentVersionResolver for StoreResolver {
    async fn get(&self, name: &str, version: &str) -> RegistryResult<Option<Value>> {
        match self.store.get(&self.repository, name, version).await {
            Ok(descriptor) => Ok(Some(descriptor)),
            Err(ocm_plugins_adapters::AdapterError::Transport(ocm_plugins_transport::TransportError::NonSuccessStatus { .. })) => Ok(None),
            Err(e) => Err(ocm_plugins_registry::RegistryError::Adapter(e.to_string())),
        }
    }

    async fn list(&self, _name: &str) -> RegistryResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Resolves every configured route's component-version type against
/// `registries` and composes them into one [`FallbackRepository`].
///
/// Returns `None` when `routes` is empty — most hosts have no fallback
/// chain configured and serve each type directly through its registry
/// entry.
pub async fn build_component_version_fallback(
    registries: &Registries,
    routes: &[FallbackRouteConfig],
    concurrency: usize,
) -> ManagerResult<Option<FallbackRepository>> {
    if routes.is_empty() {
        return Ok(None);
    }

    let mut entries = Vec::with_capacity(routes.len());
    for route in routes {
        let store = registries.component_version.get(&route.ty).await?;
        let resolver: Arc<dyn ComponentVersionResolver> = Arc::new(StoreResolver {
            store,
            repository: route.repository.clone(),
        });
        entries.push((route.prefix.clone(), route.priority, resolver));
    }

    Ok(Some(FallbackRepository::new(entries, concurrency)))
}
