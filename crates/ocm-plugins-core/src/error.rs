//! Error taxonomy for the type system and scheme registry.

use thiserror::Error;

use crate::typ::Type;

/// Errors produced by [`crate::Scheme`] and related conversions.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// A [`Type`] was registered twice with two different Rust shapes.
    #[error("type '{0}' is already registered to a different shape")]
    DuplicateType(Type),

    /// A [`Type`] has no registered shape and the scheme does not allow
    /// unknown types.
    #[error("type '{0}' is not registered")]
    UnknownType(Type),

    /// A conversion between two typed values could not be performed, e.g.
    /// because the target Rust shape does not match the source's.
    #[error("cannot convert from '{from}' into '{into}'")]
    ConvertMismatch {
        /// Source type.
        from: Type,
        /// Destination type.
        into: Type,
    },

    /// JSON canonicalization failed for a malformed document.
    #[error("failed to canonicalize JSON: {0}")]
    CanonicalizeFailed(String),

    /// A value could not be (de)serialized to/from JSON.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result alias for scheme and conversion operations.
pub type CoreResult<T> = Result<T, CoreError>;
