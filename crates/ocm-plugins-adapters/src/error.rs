//! Errors raised by the typed adapter layer.

use thiserror::Error;

/// Errors surfaced to callers of a capability's narrow domain interface.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The request failed schema validation before any transport call.
    #[error(transparent)]
    Schema(#[from] ocm_plugins_schema::SchemaError),

    /// The underlying transport call failed.
    #[error(transparent)]
    Transport(#[from] ocm_plugins_transport::TransportError),

    /// A blob's temp-file Location could not be created or read.
    #[error("blob staging I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The plugin's response did not match the expected shape.
    #[error("malformed response from plugin: {0}")]
    MalformedResponse(String),
}

/// Result alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
