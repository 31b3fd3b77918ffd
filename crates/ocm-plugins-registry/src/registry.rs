//! The generic capability registry shape shared by every capability kind
//! (component-version store, resource store, credential repository, …).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use ocm_plugins_core::Type;
use ocm_plugins_transport::TransportKind;
use tokio::sync::{Mutex, OnceCell};

use crate::error::{RegistryError, RegistryResult};
use crate::plugin_handle::{PluginHandle, PluginRecord, StartedPlugin};

/// Builds a started plugin's adapter (`Arc<T>`) from its handle, once its
/// process is up and healthy, given the plugin id and the specific type the
/// adapter instance was resolved for. Supplied by the capability-specific
/// crate (`ocm-plugins-adapters`) that knows how to wrap a `PluginClient` in
/// the narrow domain trait `T`.
pub type AdapterFactory<T> = Arc<
    dyn Fn(Arc<StartedPlugin>, String, Type) -> Pin<Box<dyn Future<Output = RegistryResult<Arc<T>>> + Send>>
        + Send
        + Sync,
>;

/// Maps `Type → plugin` for one capability kind, for both builtin and
/// external plugins, and owns the lazily constructed adapter cache for
/// external plugins.
pub struct Registry<T: ?Sized + Send + Sync + 'static> {
    builtins: parking_lot::RwLock<HashMap<Type, Arc<T>>>,
    external_by_type: parking_lot::RwLock<HashMap<Type, Arc<PluginHandle>>>,
    handles_by_id: parking_lot::RwLock<HashMap<String, Arc<PluginHandle>>>,
    constructed: Mutex<HashMap<String, Arc<T>>>,
    factory: AdapterFactory<T>,
    /// Config JSON the host passes to a plugin when starting its server,
    /// built fresh per-plugin by the caller (carries transport address,
    /// plugin id, and capability type).
    config_builder: Arc<dyn Fn(&str, &ocm_plugins_transport::Endpoint) -> String + Send + Sync>,
    /// The host's transport kind decision, shared across every capability
    /// registry so it is resolved exactly once per host instance rather than
    /// once per registry or per plugin.
    transport_kind: Arc<OnceCell<TransportKind>>,
}

impl<T: ?Sized + Send + Sync + 'static> Registry<T> {
    /// Creates an empty registry. `factory` builds the narrow adapter from a
    /// started plugin; `config_builder` builds the `--config` JSON payload
    /// for a given plugin id and chosen endpoint; `transport_kind` is the
    /// host-wide decision cell shared by every registry, so a shared
    /// `Arc<OnceCell<_>>` should be passed to each one the host constructs.
    pub fn new(
        factory: AdapterFactory<T>,
        config_builder: impl Fn(&str, &ocm_plugins_transport::Endpoint) -> String + Send + Sync + 'static,
        transport_kind: Arc<OnceCell<TransportKind>>,
    ) -> Self {
        Self {
            builtins: parking_lot::RwLock::new(HashMap::new()),
            external_by_type: parking_lot::RwLock::new(HashMap::new()),
            handles_by_id: parking_lot::RwLock::new(HashMap::new()),
            constructed: Mutex::new(HashMap::new()),
            factory,
            config_builder: Arc::new(config_builder),
            transport_kind,
        }
    }

    /// Registers an in-process implementation for `ty`. Builtins take
    /// precedence over external plugins during resolution.
    pub fn add_builtin(&self, ty: Type, implementation: Arc<T>) {
        self.builtins.write().insert(ty, implementation);
    }

    /// Declares an external plugin as the handler for each type in `types`.
    /// Does not start the plugin's process. Fails if any type is already
    /// claimed within this registry.
    pub fn add_plugin(&self, record: PluginRecord, types: &[Type]) -> RegistryResult<()> {
        {
            let external = self.external_by_type.read();
            for ty in types {
                if let Some(existing) = external.get(ty) {
                    return Err(RegistryError::DuplicateTypeRegistered {
                        ty: ty.to_string(),
                        existing_plugin_id: existing.id().to_string(),
                    });
                }
            }
        }

        let handle = Arc::new(PluginHandle::new(record.clone()));
        {
            let mut external = self.external_by_type.write();
            for ty in types {
                external.insert(ty.clone(), handle.clone());
            }
        }
        self.handles_by_id.write().insert(record.id.clone(), handle);
        Ok(())
    }

    /// Resolves `ty` to its adapter: a builtin if one is registered, the
    /// already-constructed adapter for an external plugin if this is not the
    /// first call, or a freshly started one otherwise.
    pub async fn get(&self, ty: &Type) -> RegistryResult<Arc<T>> {
        if let Some(builtin) = self.builtins.read().get(ty).cloned() {
            return Ok(builtin);
        }

        let handle = self
            .external_by_type
            .read()
            .get(ty)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(ty.to_string()))?;

        if let Some(adapter) = self.constructed.lock().await.get(handle.id()) {
            return Ok(adapter.clone());
        }

        let kind = *self.transport_kind.get_or_init(|| async { ocm_plugins_transport::probe_transport_kind().await }).await;

        let plugin_id = handle.id().to_string();
        let config_builder = self.config_builder.clone();
        let started = handle
            .get_or_start(kind, move |endpoint| config_builder(&plugin_id, endpoint))
            .await?;

        let adapter = (self.factory)(started, handle.id().to_string(), ty.clone()).await?;
        self.constructed.lock().await.insert(handle.id().to_string(), adapter.clone());
        Ok(adapter)
    }

    /// Sends SIGINT to every constructed external plugin and waits up to
    /// `per_plugin_timeout` for each to exit. Never aborts early on a single
    /// plugin's failure; shutdown errors are logged, not returned, so that
    /// remaining plugins are still signaled.
    pub async fn shutdown(&self, per_plugin_timeout: Duration) {
        let handles: Vec<Arc<PluginHandle>> = self.handles_by_id.read().values().cloned().collect();
        for handle in handles {
            if let Err(e) = handle.shutdown(per_plugin_timeout).await {
                tracing::warn!(plugin_id = handle.id(), error = %e, "error shutting down plugin");
            }
        }
    }
}
