//! Errors raised while building or running a plugin binary.

use thiserror::Error;

/// Errors raised by the plugin-authoring SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// A capability was registered for a type already claimed by an earlier
    /// registration on the same builder.
    #[error("type '{0}' is already registered on this plugin")]
    DuplicateRegistration(String),

    /// The accumulated manifest could not be serialized.
    #[error("failed to serialize plugin manifest: {0}")]
    ManifestEncoding(String),

    /// The `--config` argument was missing or not valid JSON.
    #[error("invalid --config argument: {0}")]
    InvalidConfig(String),

    /// The plugin was invoked with an unrecognized argument set.
    #[error("usage: <plugin> capabilities | <plugin> --config <json>")]
    BadInvocation,

    /// The server failed to bind or serve.
    #[error("transport error: {0}")]
    Transport(#[from] ocm_plugins_transport::TransportError),

    /// A core type-system error (schema derivation, canonicalization).
    #[error(transparent)]
    Core(#[from] ocm_plugins_core::CoreError),
}

/// Result alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
