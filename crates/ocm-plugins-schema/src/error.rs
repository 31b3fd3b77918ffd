//! Schema validation errors.

use thiserror::Error;

/// Errors raised while compiling or evaluating a plugin-declared JSON Schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema blob itself could not be compiled by `jsonschema`.
    #[error("schema for plugin '{plugin_id}' type '{ty}' failed to compile: {reason}")]
    CompileFailed {
        /// The plugin that declared the schema.
        plugin_id: String,
        /// The type the schema was declared for.
        ty: String,
        /// Underlying compiler error.
        reason: String,
    },

    /// A typed value failed validation against its plugin-declared schema.
    ///
    /// Carries the indented (pretty-printed) type body and schema so callers
    /// can render a precise diagnostic, per the host's error contract.
    #[error("value does not satisfy schema for plugin '{plugin_id}' type '{ty}': {errors}")]
    SchemaInvalid {
        /// The plugin that declared the schema.
        plugin_id: String,
        /// The type the value claims to be.
        ty: String,
        /// Human-readable validation error messages, joined by `"; "`.
        errors: String,
        /// Pretty-printed JSON body that failed validation.
        body: String,
        /// Pretty-printed JSON schema it failed against.
        schema: String,
    },

    /// The value or schema could not be serialized to JSON for validation.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
