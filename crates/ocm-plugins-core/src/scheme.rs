//! [`Scheme`]: the process-wide registry mapping [`Type`] to a concrete Rust
//! shape, and the [`Raw`] envelope used when no such shape is linked.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::typ::Type;

/// Anything that reports its own [`Type`].
///
/// [`Raw`] and every registered Object implement this.
pub trait Typed {
    /// Returns the type this value carries.
    fn get_type(&self) -> Type;
}

/// A type-erased, clonable scheme object.
///
/// Blanket-implemented for any `T: Serialize + Clone + Debug + Send + Sync +
/// 'static` — callers never implement this by hand.
pub trait SchemeObject: Any + Send + Sync + fmt::Debug {
    /// Upcast to `&dyn Any` for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// Clones the boxed value.
    fn clone_box(&self) -> Box<dyn SchemeObject>;
    /// Serializes the value to a [`serde_json::Value`].
    fn to_value(&self) -> CoreResult<Value>;
}

impl<T> SchemeObject for T
where
    T: Serialize + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn SchemeObject> {
        Box::new(self.clone())
    }

    fn to_value(&self) -> CoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Clone for Box<dyn SchemeObject> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A raw envelope: a [`Type`] plus its canonicalized JSON body.
///
/// This is the carrier used whenever the host does not have a registered
/// Rust shape for a value — which is nearly always the case for payloads
/// coming from (or going to) an external plugin.
///
/// On the wire a `Raw` is *not* nested under a `bytes` field: it flattens to
/// a single JSON object whose `type` key is the type identifier and whose
/// remaining keys are the canonicalized body. This matches the manifest
/// format in the plugin binary contract (`{"type": "oci/v1", …fields…}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    ty: Type,
    /// Canonical JSON bytes of the body, *excluding* the `type` key.
    bytes: Vec<u8>,
}

impl Raw {
    /// Builds a `Raw` from a type and an already-canonical body value.
    pub fn new(ty: Type, body: Value) -> CoreResult<Self> {
        let bytes = crate::canonical::canonicalize_value_to_bytes(&body)?;
        Ok(Self { ty, bytes })
    }

    /// An empty raw envelope of the given type (`{}`).
    pub fn empty(ty: Type) -> Self {
        Self {
            ty,
            bytes: b"{}".to_vec(),
        }
    }

    /// The canonical JSON bytes of the body (without the `type` key).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parses the body back into a [`serde_json::Value`].
    pub fn body_value(&self) -> CoreResult<Value> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }

    /// Deserializes the body into a concrete type.
    pub fn decode<T: DeserializeOwned>(&self) -> CoreResult<T> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}

impl Typed for Raw {
    fn get_type(&self) -> Type {
        self.ty.clone()
    }
}

impl Serialize for Raw {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let body: Value = serde_json::from_slice(&self.bytes).map_err(serde::ser::Error::custom)?;
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.ty.to_string()));
        match body {
            Value::Object(fields) => {
                for (k, v) in fields {
                    if k != "type" {
                        map.insert(k, v);
                    }
                }
            }
            other => {
                map.insert("value".to_string(), other);
            }
        }
        Value::Object(map).serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Raw {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        let obj = value
            .as_object_mut()
            .ok_or_else(|| serde::de::Error::custom("raw envelope must be a JSON object"))?;
        let ty_str = obj
            .remove("type")
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| serde::de::Error::custom("raw envelope missing 'type' field"))?;
        let ty: Type = ty_str.parse().map_err(serde::de::Error::custom)?;
        let body = Value::Object(std::mem::take(obj));
        let bytes = crate::canonical::canonicalize_value_to_bytes(&body)
            .map_err(serde::de::Error::custom)?;
        Ok(Raw { ty, bytes })
    }
}

/// Either a [`Raw`] envelope or a boxed concrete Object.
#[derive(Debug, Clone)]
pub enum TypedValue {
    /// An untyped (from the host's perspective) JSON envelope.
    Raw(Raw),
    /// A concrete, registered Rust shape.
    Object(Box<dyn SchemeObject>),
}

impl Typed for TypedValue {
    fn get_type(&self) -> Type {
        match self {
            TypedValue::Raw(r) => r.get_type(),
            TypedValue::Object(_) => Type::new("object"),
        }
    }
}

struct Entry {
    rust_type: TypeId,
    default_factory: fn() -> Box<dyn SchemeObject>,
}

struct Inner {
    allow_unknown: bool,
    by_type: HashMap<Type, Entry>,
    aliases_by_rust_type: HashMap<TypeId, Vec<Type>>,
}

/// The process-wide mapping from [`Type`] to a concrete Rust shape.
///
/// Supports alias registration (several `Type`s mapping to the same Rust
/// shape) and an "allow unknown" mode in which unregistered types decode to
/// [`Raw`] instead of failing.
pub struct Scheme {
    inner: RwLock<Inner>,
}

impl Scheme {
    /// Creates an empty scheme.
    ///
    /// When `allow_unknown` is set, [`Scheme::new_object`] and the
    /// `Raw → Object` conversions return [`Raw`] for unregistered types
    /// instead of failing with [`CoreError::UnknownType`].
    pub fn new(allow_unknown: bool) -> Self {
        Self {
            inner: RwLock::new(Inner {
                allow_unknown,
                by_type: HashMap::new(),
                aliases_by_rust_type: HashMap::new(),
            }),
        }
    }

    /// Whether this scheme decodes unregistered types into [`Raw`].
    pub fn allows_unknown(&self) -> bool {
        self.inner.read().allow_unknown
    }

    /// Registers `types` as aliases of the Rust shape `T`.
    ///
    /// Fails with [`CoreError::DuplicateType`] if any of `types` is already
    /// bound to a *different* Rust shape. Re-registering the same `Type` to
    /// the same shape is a no-op.
    pub fn register<T>(&self, types: &[Type]) -> CoreResult<()>
    where
        T: SchemeObject + Default + 'static,
    {
        let rust_type = TypeId::of::<T>();
        let factory: fn() -> Box<dyn SchemeObject> = || Box::new(T::default());

        let mut inner = self.inner.write();
        for ty in types {
            if let Some(existing) = inner.by_type.get(ty)
                && existing.rust_type != rust_type
            {
                return Err(CoreError::DuplicateType(ty.clone()));
            }
        }
        for ty in types {
            inner.by_type.insert(
                ty.clone(),
                Entry {
                    rust_type,
                    default_factory: factory,
                },
            );
            let aliases = inner.aliases_by_rust_type.entry(rust_type).or_default();
            if !aliases.contains(ty) {
                aliases.push(ty.clone());
            }
        }
        Ok(())
    }

    /// Returns whether `ty` has a registered shape.
    pub fn is_registered(&self, ty: &Type) -> bool {
        self.inner.read().by_type.contains_key(ty)
    }

    fn ensure_registered(&self, ty: &Type) -> CoreResult<()> {
        let inner = self.inner.read();
        if inner.by_type.contains_key(ty) || inner.allow_unknown {
            Ok(())
        } else {
            Err(CoreError::UnknownType(ty.clone()))
        }
    }

    /// Returns a fresh instance of the Rust shape registered for `ty`.
    ///
    /// If `ty` is unregistered: returns an empty [`Raw`] of that type when
    /// `allow_unknown` is set, otherwise fails with
    /// [`CoreError::UnknownType`].
    pub fn new_object(&self, ty: &Type) -> CoreResult<TypedValue> {
        let inner = self.inner.read();
        match inner.by_type.get(ty) {
            Some(entry) => Ok(TypedValue::Object((entry.default_factory)())),
            None if inner.allow_unknown => Ok(TypedValue::Raw(Raw::empty(ty.clone()))),
            None => Err(CoreError::UnknownType(ty.clone())),
        }
    }

    /// Finds the [`Type`] registered for Rust shape `T`, preferring a
    /// versioned alias over an unversioned one so that fully qualified types
    /// win over short aliases.
    pub fn type_for_prototype<T: 'static>(&self) -> Option<Type> {
        let inner = self.inner.read();
        let aliases = inner.aliases_by_rust_type.get(&TypeId::of::<T>())?;
        aliases
            .iter()
            .find(|t| t.is_versioned())
            .or_else(|| aliases.first())
            .cloned()
    }

    /// Raw → Raw: byte-wise deep copy.
    pub fn convert_raw_to_raw(&self, raw: &Raw) -> Raw {
        raw.clone()
    }

    /// Raw → Object: JSON-decodes `raw`'s body into `T`, requiring that
    /// `raw`'s type is registered unless `allow_unknown` is set.
    pub fn convert_raw_to_object<T: DeserializeOwned + 'static>(&self, raw: &Raw) -> CoreResult<T> {
        self.ensure_registered(&raw.get_type())?;
        raw.decode()
    }

    /// Object → Raw: JSON-encodes and canonicalizes `obj`, populating
    /// `Raw.type` from `ty_hint` or, if absent, from the scheme's
    /// registration for `T`.
    pub fn convert_object_to_raw<T: Serialize + 'static>(
        &self,
        obj: &T,
        ty_hint: Option<Type>,
    ) -> CoreResult<Raw> {
        let ty = ty_hint
            .or_else(|| self.type_for_prototype::<T>())
            .ok_or_else(|| CoreError::UnknownType(Type::new("<unregistered>")))?;
        let value = serde_json::to_value(obj)?;
        Raw::new(ty, value)
    }

    /// Object → Object: deep-clones `obj` after checking it downcasts to the
    /// requested Rust shape `T` (the scheme's notion of "assignability").
    pub fn convert_object_to_object<T: Clone + 'static>(boxed: &dyn SchemeObject) -> CoreResult<T> {
        boxed
            .as_any()
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| CoreError::ConvertMismatch {
                from: Type::new(std::any::type_name::<dyn SchemeObject>()),
                into: Type::new(std::any::type_name::<T>()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    struct RepoSpec {
        #[serde(default)]
        base_url: String,
    }

    #[test]
    fn register_and_new_object() {
        let scheme = Scheme::new(false);
        scheme
            .register::<RepoSpec>(&[Type::with_version("oci", "v1"), Type::new("oci")])
            .unwrap();

        let proto = scheme.type_for_prototype::<RepoSpec>().unwrap();
        assert_eq!(proto, Type::with_version("oci", "v1"));

        let obj = scheme.new_object(&proto).unwrap();
        assert!(matches!(obj, TypedValue::Object(_)));
    }

    #[test]
    fn duplicate_type_fails() {
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        struct Other;

        let scheme = Scheme::new(false);
        scheme.register::<RepoSpec>(&[Type::new("oci")]).unwrap();
        let err = scheme.register::<Other>(&[Type::new("oci")]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateType(_)));
    }

    #[test]
    fn unknown_type_without_allow_unknown_fails() {
        let scheme = Scheme::new(false);
        let err = scheme.new_object(&Type::new("missing")).unwrap_err();
        assert!(matches!(err, CoreError::UnknownType(_)));
    }

    #[test]
    fn unknown_type_with_allow_unknown_yields_raw() {
        let scheme = Scheme::new(true);
        let obj = scheme.new_object(&Type::new("missing")).unwrap();
        assert!(matches!(obj, TypedValue::Raw(_)));
    }

    #[test]
    fn raw_round_trip_preserves_type_and_body() {
        let raw = Raw::new(
            Type::with_version("oci", "v1"),
            serde_json::json!({"baseUrl": "https://example.com"}),
        )
        .unwrap();
        let json = serde_json::to_string(&raw).unwrap();
        let back: Raw = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get_type(), raw.get_type());
        assert_eq!(back.body_value().unwrap(), raw.body_value().unwrap());
    }

    #[test]
    fn object_to_raw_and_back() {
        let scheme = Scheme::new(false);
        scheme
            .register::<RepoSpec>(&[Type::with_version("oci", "v1")])
            .unwrap();

        let spec = RepoSpec {
            base_url: "https://example.com".into(),
        };
        let raw = scheme.convert_object_to_raw(&spec, None).unwrap();
        assert_eq!(raw.get_type(), Type::with_version("oci", "v1"));

        let back: RepoSpec = scheme.convert_raw_to_object(&raw).unwrap();
        assert_eq!(back, spec);
    }
}
