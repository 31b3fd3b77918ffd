//! Typed adapter layer: narrow per-capability domain interfaces, and
//! the `Plugin*` adapters that implement them by wrapping a started external
//! plugin's transport client. Builtins (`ocm-plugins-builtin`) implement the
//! same traits directly, with no translation.

pub mod base;
pub mod blob;
pub mod component_version;
pub mod credential;
pub mod digest;
pub mod error;
pub mod input;
pub mod lister;
pub mod resource;
pub mod signing;
pub mod traits;
pub mod types;

pub use base::AdapterBase;
pub use blob::PluginBlobTransformer;
pub use component_version::PluginComponentVersionStore;
pub use credential::PluginCredentialRepository;
pub use digest::PluginDigestProcessor;
pub use error::{AdapterError, AdapterResult};
pub use input::PluginInputProcessor;
pub use lister::PluginLister;
pub use resource::PluginResourceStore;
pub use signing::PluginSigner;
pub use traits::{BlobTransformer, ComponentVersionStore, CredentialRepository, DigestProcessor, InputProcessor, Lister, ResourceStore, Signer};
