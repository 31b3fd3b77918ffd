//! Registry-level errors.

use thiserror::Error;

/// Errors raised while registering or resolving a capability-kind registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type is already owned by another plugin in this registry.
    #[error("type '{ty}' is already registered by plugin '{existing_plugin_id}'")]
    DuplicateTypeRegistered {
        /// The type that collided.
        ty: String,
        /// The plugin that already owns it.
        existing_plugin_id: String,
    },

    /// No plugin (builtin or external) is registered for the requested type.
    #[error("no plugin registered for type '{0}'")]
    NotFound(String),

    /// The plugin declared a config type absent from the host's active
    /// configuration.
    #[error("plugin '{plugin_id}' requires config type '{ty}', which is absent from the active configuration")]
    MissingRequiredConfig {
        /// The plugin that declared the requirement.
        plugin_id: String,
        /// The missing config type.
        ty: String,
    },

    /// Starting (or re-using) a plugin's process/transport failed.
    #[error(transparent)]
    Transport(#[from] ocm_plugins_transport::TransportError),

    /// Building the typed adapter for a freshly started plugin failed.
    #[error("failed to construct adapter for plugin '{plugin_id}': {reason}")]
    AdapterConstruction {
        /// The plugin the adapter was being built for.
        plugin_id: String,
        /// The underlying failure.
        reason: String,
    },

    /// Schema validation rejected the request before any transport call.
    #[error(transparent)]
    Schema(#[from] ocm_plugins_schema::SchemaError),

    /// A resolved adapter's own call failed, outside of transport/schema
    /// errors this crate already has variants for (e.g. a fallback
    /// resolver wrapping `ocm-plugins-adapters`'s `AdapterError`).
    #[error("adapter call failed: {0}")]
    Adapter(String),
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
