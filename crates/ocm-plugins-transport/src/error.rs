//! Transport-level errors.

use thiserror::Error;

/// Errors raised while choosing, dialing, or serving a plugin IPC endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Neither a Unix domain socket nor a TCP port could be allocated.
    #[error("failed to allocate a local endpoint for plugin '{plugin_id}': {reason}")]
    EndpointUnavailable {
        /// The plugin the endpoint was being allocated for.
        plugin_id: String,
        /// Underlying OS error.
        reason: String,
    },

    /// The plugin process could not be spawned.
    #[error("failed to spawn plugin '{plugin_id}': {reason}")]
    SpawnFailed {
        /// The plugin that failed to spawn.
        plugin_id: String,
        /// Underlying OS error.
        reason: String,
    },

    /// The plugin did not become healthy before the startup deadline elapsed.
    #[error("plugin '{plugin_id}' did not become healthy within {deadline_secs}s")]
    StartTimeout {
        /// The plugin that failed to start in time.
        plugin_id: String,
        /// The deadline that was exceeded, in seconds.
        deadline_secs: u64,
    },

    /// A request could not be sent or its response could not be read.
    #[error("request to plugin '{plugin_id}' failed: {reason}")]
    RequestFailed {
        /// The plugin the request was addressed to.
        plugin_id: String,
        /// Underlying transport error.
        reason: String,
    },

    /// The plugin responded with a non-2xx status.
    #[error("plugin '{plugin_id}' responded with status {status}: {body}")]
    NonSuccessStatus {
        /// The plugin that responded.
        plugin_id: String,
        /// The HTTP status code returned.
        status: u16,
        /// The response body, if any.
        body: String,
    },

    /// A request was cancelled before it completed.
    #[error("request to plugin '{plugin_id}' was cancelled")]
    Cancelled {
        /// The plugin the request was addressed to.
        plugin_id: String,
    },

    /// Serialization/deserialization of a request or response body failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// An I/O error occurred on the underlying socket or pipe.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
