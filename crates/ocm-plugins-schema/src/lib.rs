//! Per-plugin, per-type JSON Schema validation.
//!
//! The host retains the JSON Schema blob declared by each plugin for each of
//! its supported types (from the manifest's `capabilitySpecs`). Before
//! forwarding a request whose payload carries a typed field, the host asks
//! this crate to validate the (canonicalized) payload against the declared
//! schema — compiling it lazily on first use and caching the compiled form
//! per `(plugin, type)` pair so repeated calls pay the compilation cost once.
//!
//! Schema compilation itself is delegated to the `jsonschema` crate; this
//! crate only owns the caching, the canonicalization step, and the
//! bare-string carve-out documented below.

pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::Validator;
use ocm_plugins_core::{Type, canonicalize};
use parking_lot::RwLock;
use serde_json::Value;

pub use error::{SchemaError, SchemaResult};

/// Key identifying one plugin's declared schema for one type.
type Key = (String, Type);

/// Caches declared schema blobs and their lazily compiled validators, keyed
/// by `(plugin id, type)`.
#[derive(Default)]
pub struct SchemaValidator {
    declared: RwLock<HashMap<Key, Value>>,
    compiled: RwLock<HashMap<Key, Arc<Validator>>>,
}

impl SchemaValidator {
    /// Creates an empty validator with no declared schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the JSON Schema a plugin declared for one of its supported
    /// types. Called once per `(plugin, type)` while processing a manifest;
    /// re-declaring overwrites the previous schema and drops any cached
    /// compiled form.
    pub fn declare(&self, plugin_id: &str, ty: &Type, schema: Value) {
        let key = (plugin_id.to_string(), ty.clone());
        self.declared.write().insert(key.clone(), schema);
        self.compiled.write().remove(&key);
    }

    /// Returns whether a schema has been declared for `(plugin_id, ty)`.
    pub fn has_schema(&self, plugin_id: &str, ty: &Type) -> bool {
        self.declared
            .read()
            .contains_key(&(plugin_id.to_string(), ty.clone()))
    }

    fn compiled_for(&self, plugin_id: &str, ty: &Type) -> SchemaResult<Option<Arc<Validator>>> {
        let key = (plugin_id.to_string(), ty.clone());

        if let Some(v) = self.compiled.read().get(&key) {
            return Ok(Some(v.clone()));
        }

        let Some(schema) = self.declared.read().get(&key).cloned() else {
            return Ok(None);
        };

        let validator = jsonschema::validator_for(&schema).map_err(|e| SchemaError::CompileFailed {
            plugin_id: plugin_id.to_string(),
            ty: ty.to_string(),
            reason: e.to_string(),
        })?;
        let validator = Arc::new(validator);
        self.compiled.write().insert(key, validator.clone());
        Ok(Some(validator))
    }

    /// Validates `value` — the typed payload about to be sent to
    /// `plugin_id` as `ty` — against that plugin's declared schema for `ty`.
    ///
    /// No-ops (returns `Ok(())`) when:
    /// - no schema was declared for `(plugin_id, ty)`, or
    /// - `value` is a bare JSON string rather than an object — this
    ///   tolerates the schema-less identifier passes used by listing
    ///   endpoints (documented as an intentional carve-out, not a gap; see
    ///   `DESIGN.md`).
    pub fn validate(&self, plugin_id: &str, ty: &Type, value: &Value) -> SchemaResult<()> {
        if matches!(value, Value::String(_)) {
            return Ok(());
        }

        let Some(validator) = self.compiled_for(plugin_id, ty)? else {
            return Ok(());
        };

        let canonical_bytes = canonicalize(serde_json::to_vec(value)?.as_slice())
            .map_err(|e| SchemaError::Json(e.to_string()))?;
        let canonical: Value = serde_json::from_slice(&canonical_bytes)?;

        let errors: Vec<String> = validator
            .iter_errors(&canonical)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            return Ok(());
        }

        let declared_schema = self
            .declared
            .read()
            .get(&(plugin_id.to_string(), ty.clone()))
            .cloned()
            .unwrap_or(Value::Null);

        Err(SchemaError::SchemaInvalid {
            plugin_id: plugin_id.to_string(),
            ty: ty.to_string(),
            errors: errors.join("; "),
            body: serde_json::to_string_pretty(&canonical)?,
            schema: serde_json::to_string_pretty(&declared_schema)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ty() -> Type {
        Type::with_version("oci", "v1")
    }

    #[test]
    fn no_declared_schema_skips_validation() {
        let v = SchemaValidator::new();
        assert!(v.validate("p1", &ty(), &json!({"anything": true})).is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let v = SchemaValidator::new();
        v.declare("p1", &ty(), json!({"type": "object", "required": ["baseUrl"]}));
        let err = v.validate("p1", &ty(), &json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaInvalid { .. }));
    }

    #[test]
    fn satisfying_schema_passes() {
        let v = SchemaValidator::new();
        v.declare("p1", &ty(), json!({"type": "object", "required": ["baseUrl"]}));
        assert!(
            v.validate("p1", &ty(), &json!({"baseUrl": "https://example.com"}))
                .is_ok()
        );
    }

    #[test]
    fn bare_string_payload_skips_validation() {
        let v = SchemaValidator::new();
        v.declare("p1", &ty(), json!({"type": "object", "required": ["baseUrl"]}));
        assert!(v.validate("p1", &ty(), &json!("just-an-identifier")).is_ok());
    }

    #[test]
    fn compiled_validator_is_cached() {
        let v = SchemaValidator::new();
        v.declare("p1", &ty(), json!({"type": "object"}));
        assert!(v.compiled.read().is_empty());
        v.validate("p1", &ty(), &json!({})).unwrap();
        assert_eq!(v.compiled.read().len(), 1);
        v.validate("p1", &ty(), &json!({})).unwrap();
        assert_eq!(v.compiled.read().len(), 1);
    }
}
