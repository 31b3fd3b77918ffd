//! Plugin Manager errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while discovering and registering plugins.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Walking the plugin directory failed.
    #[error("failed to read plugin directory {dir}: {source}")]
    DirectoryRead {
        /// The directory that could not be read.
        dir: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `candidate capabilities` failed or returned invalid JSON.
    #[error("plugin candidate '{candidate}' failed capability discovery: {reason}")]
    ManifestInvalid {
        /// The candidate binary's plugin id.
        candidate: String,
        /// What went wrong.
        reason: String,
    },

    /// A capability spec named a kind this host has no registry for.
    #[error("plugin '{plugin_id}' declared unknown capability kind '{kind}'")]
    UnknownCapabilityKind {
        /// The plugin that declared it.
        plugin_id: String,
        /// The unrecognized kind tag.
        kind: String,
    },

    /// The plugin's `supportedConfigTypes` has no matching entry in the
    /// host's active configuration.
    #[error("plugin '{plugin_id}' requires config type '{ty}', which is absent from the active configuration")]
    MissingRequiredConfig {
        /// The plugin that declared the requirement.
        plugin_id: String,
        /// The unmatched config type.
        ty: String,
    },

    /// Dispatching a capability spec to its registry failed.
    #[error(transparent)]
    Registry(#[from] ocm_plugins_registry::RegistryError),

    /// Running or parsing `candidate capabilities` failed at the transport
    /// layer.
    #[error(transparent)]
    Transport(#[from] ocm_plugins_transport::TransportError),

    /// Loading the host's own configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for Plugin Manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;
