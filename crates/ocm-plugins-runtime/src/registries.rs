//! The eight capability-kind registries, bundled together with their
//! adapter factories and per-plugin config builders wired up once at
//! startup.

use std::sync::Arc;
use std::time::Duration;

use ocm_plugins_adapters::{
    AdapterBase, BlobTransformer, ComponentVersionStore, CredentialRepository, DigestProcessor, InputProcessor, Lister, PluginBlobTransformer,
    PluginComponentVersionStore, PluginCredentialRepository, PluginDigestProcessor, PluginInputProcessor, PluginLister, PluginResourceStore,
    PluginSigner, ResourceStore, Signer,
};
use ocm_plugins_core::Type;
use ocm_plugins_registry::{AdapterFactory, Registry, StartedPlugin};
use ocm_plugins_schema::SchemaValidator;
use ocm_plugins_sdk::{ServeConfig, TransportKind};
use ocm_plugins_transport::{Endpoint, TransportKind as HostTransportKind};
use tokio::sync::OnceCell;

/// Capability kind tags, as they appear in a manifest's `capabilitySpecs`.
/// The Plugin Manager matches a capability spec's kind against these
/// to choose which registry to dispatch to.
pub mod kinds {
    pub const COMPONENT_VERSION_REPOSITORY: &str = "componentVersionRepository";
    pub const RESOURCE_REPOSITORY: &str = "resourceRepository";
    pub const CREDENTIAL_REPOSITORY: &str = "credentialRepository";
    pub const INPUT_PROCESSOR: &str = "inputProcessor";
    pub const DIGEST_PROCESSOR: &str = "digestProcessor";
    pub const SIGNER: &str = "signer";
    pub const BLOB_TRANSFORMER: &str = "blobTransformer";
    pub const LISTER: &str = "lister";
}

fn config_builder_for(kind: Type) -> impl Fn(&str, &Endpoint) -> String + Send + Sync + 'static {
    move |plugin_id, endpoint| {
        let (transport, location) = match endpoint {
            Endpoint::Uds(path) => (TransportKind::Unix, path.display().to_string()),
            Endpoint::Tcp(addr) => (TransportKind::Tcp, addr.to_string()),
        };
        let cfg = ServeConfig {
            id: plugin_id.to_string(),
            transport,
            plugin_type: kind.clone(),
            location,
            idle_timeout: None,
            config_types: Vec::new(),
        };
        serde_json::to_string(&cfg).unwrap_or_else(|_| "{}".to_string())
    }
}

fn component_version_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn ComponentVersionStore> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginComponentVersionStore(base)) as Arc<dyn ComponentVersionStore>)
        })
    })
}

fn resource_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn ResourceStore> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginResourceStore(base)) as Arc<dyn ResourceStore>)
        })
    })
}

fn credential_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn CredentialRepository> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginCredentialRepository(base)) as Arc<dyn CredentialRepository>)
        })
    })
}

fn input_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn InputProcessor> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginInputProcessor(base)) as Arc<dyn InputProcessor>)
        })
    })
}

fn digest_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn DigestProcessor> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginDigestProcessor(base)) as Arc<dyn DigestProcessor>)
        })
    })
}

fn signer_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn Signer> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginSigner(base)) as Arc<dyn Signer>)
        })
    })
}

fn blob_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn BlobTransformer> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginBlobTransformer(base)) as Arc<dyn BlobTransformer>)
        })
    })
}

fn lister_factory(schema: Arc<SchemaValidator>) -> AdapterFactory<dyn Lister> {
    Arc::new(move |started: Arc<StartedPlugin>, plugin_id: String, ty: Type| {
        let schema = schema.clone();
        Box::pin(async move {
            let base = AdapterBase::new(started, schema, plugin_id, ty);
            Ok(Arc::new(PluginLister(base)) as Arc<dyn Lister>)
        })
    })
}

/// The eight per-capability-kind registries, plus the schema validator they
/// all share (declared schemas are keyed by `(plugin_id, type)`, so one
/// instance safely serves every capability kind).
pub struct Registries {
    pub schema: Arc<SchemaValidator>,
    pub component_version: Arc<Registry<dyn ComponentVersionStore>>,
    pub resource: Arc<Registry<dyn ResourceStore>>,
    pub credential: Arc<Registry<dyn CredentialRepository>>,
    pub input: Arc<Registry<dyn InputProcessor>>,
    pub digest: Arc<Registry<dyn DigestProcessor>>,
    pub signer: Arc<Registry<dyn Signer>>,
    pub blob: Arc<Registry<dyn BlobTransformer>>,
    pub lister: Arc<Registry<dyn Lister>>,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries {
    /// Builds an empty set of registries, each wired with its adapter
    /// factory and config builder. Builtins are merged in separately via
    /// `ocm_plugins_builtin::register_builtin`.
    pub fn new() -> Self {
        let schema = Arc::new(SchemaValidator::new());
        // Shared across every capability kind so the host's transport choice
        // (UDS vs. TCP) is resolved exactly once, not once per registry.
        let transport_kind: Arc<OnceCell<HostTransportKind>> = Arc::new(OnceCell::new());

        Self {
            component_version: Arc::new(Registry::new(
                component_version_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::COMPONENT_VERSION_REPOSITORY, "v1")),
                transport_kind.clone(),
            )),
            resource: Arc::new(Registry::new(
                resource_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::RESOURCE_REPOSITORY, "v1")),
                transport_kind.clone(),
            )),
            credential: Arc::new(Registry::new(
                credential_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::CREDENTIAL_REPOSITORY, "v1")),
                transport_kind.clone(),
            )),
            input: Arc::new(Registry::new(
                input_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::INPUT_PROCESSOR, "v1")),
                transport_kind.clone(),
            )),
            digest: Arc::new(Registry::new(
                digest_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::DIGEST_PROCESSOR, "v1")),
                transport_kind.clone(),
            )),
            signer: Arc::new(Registry::new(
                signer_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::SIGNER, "v1")),
                transport_kind.clone(),
            )),
            blob: Arc::new(Registry::new(
                blob_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::BLOB_TRANSFORMER, "v1")),
                transport_kind.clone(),
            )),
            lister: Arc::new(Registry::new(
                lister_factory(schema.clone()),
                config_builder_for(Type::with_version(kinds::LISTER, "v1")),
                transport_kind,
            )),
            schema,
        }
    }

    /// Sends `SIGINT` to every constructed external plugin across all eight
    /// registries and waits up to `per_plugin_timeout` for each.
    pub async fn shutdown(&self, per_plugin_timeout: Duration) {
        tokio::join!(
            self.component_version.shutdown(per_plugin_timeout),
            self.resource.shutdown(per_plugin_timeout),
            self.credential.shutdown(per_plugin_timeout),
            self.input.shutdown(per_plugin_timeout),
            self.digest.shutdown(per_plugin_timeout),
            self.signer.shutdown(per_plugin_timeout),
            self.blob.shutdown(per_plugin_timeout),
            self.lister.shutdown(per_plugin_timeout),
        );
    }
}

