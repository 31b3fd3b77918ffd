//! Narrow per-capability domain interfaces. Each is implemented either
//! directly by a builtin (`ocm-plugins-builtin`) or by this crate's
//! `Plugin*Adapter`, which wraps a started external plugin's `PluginClient`.

use async_trait::async_trait;
use ocm_plugins_core::Identity;
use ocm_plugins_transport::Location;
use serde_json::Value;

use crate::error::AdapterResult;

/// Reads and writes component-version descriptors in a repository.
#[async_trait]
pub trait ComponentVersionStore: Send + Sync {
    /// Fetches a component-version descriptor.
    async fn get(&self, repository: &Value, name: &str, version: &str) -> AdapterResult<Value>;

    /// Writes a component-version descriptor.
    async fn add(&self, repository: &Value, descriptor: &Value) -> AdapterResult<()>;

    /// Downloads a local resource into `target`, verifying the file exists
    /// afterward.
    async fn download_local_resource(
        &self,
        repository: &Value,
        name: &str,
        version: &str,
        identity: &Identity,
        target: &Location,
    ) -> AdapterResult<()>;

    /// Uploads a local resource staged at `resource_location`.
    async fn upload_local_resource(
        &self,
        repository: &Value,
        name: &str,
        version: &str,
        resource: &Value,
        resource_location: &Location,
    ) -> AdapterResult<()>;
}

/// Global (not component-scoped) resource storage.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Downloads `resource`'s bytes to `target`.
    async fn download(&self, resource: &Value, target: &Location) -> AdapterResult<()>;

    /// Uploads bytes staged at `resource_location` as `resource`.
    async fn upload(&self, resource: &Value, resource_location: &Location) -> AdapterResult<()>;
}

/// Resolves a consumer identity plus credential-store spec into credential
/// attributes.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Resolves credentials for `identity` against `repository_spec`.
    async fn resolve(&self, identity: &Identity, repository_spec: &Value) -> AdapterResult<Identity>;
}

/// Produces resource/source blobs from an input spec.
#[async_trait]
pub trait InputProcessor: Send + Sync {
    /// Processes a resource input spec.
    async fn process_resource(&self, spec: &Value) -> AdapterResult<(Location, Value)>;

    /// Processes a source input spec.
    async fn process_source(&self, spec: &Value) -> AdapterResult<(Location, Value)>;
}

/// Computes and attaches digest fields to a resource descriptor.
#[async_trait]
pub trait DigestProcessor: Send + Sync {
    /// Returns `resource` with digest fields populated.
    async fn process(&self, resource: &Value) -> AdapterResult<Value>;
}

/// Signs and verifies component-version descriptors.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs `descriptor` per `spec`, returning the signed descriptor.
    async fn sign(&self, descriptor: &Value, spec: &Value) -> AdapterResult<Value>;

    /// Verifies `descriptor` per `spec`.
    async fn verify(&self, descriptor: &Value, spec: &Value) -> AdapterResult<()>;

    /// Resolves the signer identity for `spec`.
    async fn signer_identity(&self, spec: &Value) -> AdapterResult<Identity>;

    /// Resolves the verifier identity for `spec`.
    async fn verifier_identity(&self, spec: &Value) -> AdapterResult<Identity>;
}

/// Transforms a blob, or passes it through unchanged (`identity`).
#[async_trait]
pub trait BlobTransformer: Send + Sync {
    /// Transforms `blob` per `spec`, returning the result's Location.
    async fn transform(&self, blob: &Location, spec: &Value) -> AdapterResult<Location>;

    /// Passes `blob` through unchanged, returning its Location.
    async fn identity(&self, blob: &Location, spec: &Value) -> AdapterResult<Location>;
}

/// Pages through component names known to a repository.
#[async_trait]
pub trait Lister: Send + Sync {
    /// Returns the next page of component names.
    async fn list(&self, continuation_token: Option<&str>) -> AdapterResult<(Vec<String>, Option<String>)>;
}
