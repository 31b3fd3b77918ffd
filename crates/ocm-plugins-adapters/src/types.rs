//! Wire-level request/response shapes for the capability endpoint catalog
//! Bodies carry `Value` payloads for the repository spec, descriptor,
//! and resource fields since their concrete shape is plugin-defined; callers
//! that know the concrete type decode it themselves via `serde_json::from_value`.

use ocm_plugins_core::Identity;
use ocm_plugins_transport::Location;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /component-version/upload` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadComponentVersion {
    /// Repository spec the descriptor is being written to.
    pub repository: Value,
    /// The component-version descriptor.
    pub descriptor: Value,
}

/// `POST /local-resource/upload` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLocalResource {
    /// Repository spec the resource is being written to.
    pub repository: Value,
    /// Owning component name.
    pub name: String,
    /// Owning component version.
    pub version: String,
    /// Where the resource's bytes are staged for the plugin to read.
    pub resource_location: Location,
    /// The resource descriptor metadata.
    pub resource: Value,
}

/// `POST /resource/download` and `/resource/upload` share this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTransfer {
    /// The resource descriptor.
    pub resource: Value,
    /// Where to read from (upload) or write to (download), if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_location: Option<Location>,
}

/// `POST /credentials/resolve` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveCredentials {
    /// The consumer identity to resolve credentials for.
    pub identity: Identity,
    /// The credential-store spec to resolve against.
    pub repository_spec: Value,
}

/// `POST /input/resource` and `/input/source` share this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInput {
    /// The input spec describing what to process.
    pub spec: Value,
}

/// Response from an input-processing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInputResult {
    /// Where the produced blob was written.
    pub location: Location,
    /// Updated descriptor metadata produced by processing.
    pub descriptor: Value,
}

/// `POST /digest/process` body and response (the resource is updated in
/// place).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDigest {
    /// The resource descriptor to compute/attach a digest for.
    pub resource: Value,
}

/// `POST /sign` and `/verify` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignPayload {
    /// The component-version descriptor being signed or verified.
    pub descriptor: Value,
    /// The signing/verification spec (algorithm, key reference, …).
    pub spec: Value,
}

/// `POST /sign/identity` and `/verify/identity` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerIdentity {
    /// The signing/verification spec to resolve an identity for.
    pub spec: Value,
}

/// `POST /transform-blob` and `/identity` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformBlob {
    /// The source blob, referenced by Location.
    pub blob: Location,
    /// The transformation spec.
    pub spec: Value,
}

/// Response carrying a single transformed/produced blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobResult {
    /// Where the result blob was written.
    pub blob: Location,
}

/// A page of component names from a lister plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentPage {
    /// Component names in this page.
    pub components: Vec<String>,
    /// Opaque token to fetch the next page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}
