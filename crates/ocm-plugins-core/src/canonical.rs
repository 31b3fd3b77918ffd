//! Canonical JSON normalization.
//!
//! The canonical form is what the host writes into [`crate::Raw`] bodies and
//! what the schema validator receives: object keys are sorted lexicographically
//! (recursively, including inside arrays), and numbers are encoded in their
//! shortest round-tripping form — which `serde_json` already produces, so
//! canonicalization here is purely a key-ordering transform.

use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Sorts all object keys in `value` lexicographically, recursively.
///
/// Idempotent: `canonical_value(canonical_value(x)) == canonical_value(x)`.
pub fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = serde_json::Map::new();
            for (k, v) in entries {
                out.insert(k.clone(), canonical_value(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}

/// Parses `bytes` as JSON, canonicalizes it, and re-serializes to canonical bytes.
pub fn canonicalize(bytes: &[u8]) -> CoreResult<Vec<u8>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::CanonicalizeFailed(e.to_string()))?;
    canonicalize_value_to_bytes(&value)
}

/// Serializes an already-parsed [`Value`] to canonical bytes.
pub fn canonicalize_value_to_bytes(value: &Value) -> CoreResult<Vec<u8>> {
    let canon = canonical_value(value);
    serde_json::to_vec(&canon).map_err(|e| CoreError::CanonicalizeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_object_keys_recursively() {
        let input = json!({"b": 1, "a": {"d": 2, "c": 3}});
        let canon = canonical_value(&input);
        let rendered = serde_json::to_string(&canon).unwrap();
        assert_eq!(rendered, r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn idempotent() {
        let input = json!({"z": [3, {"y": 1, "x": 2}], "a": 1});
        let once = canonical_value(&input);
        let twice = canonical_value(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn canonicalize_round_trips_bytes() {
        let bytes = br#"{"b":1,"a":2}"#;
        let canon = canonicalize(bytes).unwrap();
        assert_eq!(canon, br#"{"a":2,"b":1}"#);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(canonicalize(b"{not json}").is_err());
    }
}
