//! The [`Type`] identifier: a name plus an optional version.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A versioned type identifier, rendered as `name/version` or bare `name`.
///
/// Equality is structural: `Type::new("oci")` and `Type::new("oci/v1")` are
/// distinct values. Unversioned types are conventionally used as *aliases*
/// for a versioned type; [`crate::Scheme::register`] lets several `Type`s —
/// versioned or not — point at the same Rust shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Type {
    name: String,
    version: Option<String>,
}

impl Type {
    /// Creates a bare, unversioned type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Creates a versioned type.
    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// The bare name component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version component, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether this type carries a version.
    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// Returns the unversioned alias of this type.
    pub fn unversioned(&self) -> Type {
        Type::new(self.name.clone())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}/{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for Type {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.split_once('/') {
            Some((name, version)) => Type::with_version(name, version),
            None => Type::new(s),
        })
    }
}

impl From<&str> for Type {
    fn from(s: &str) -> Self {
        s.parse().unwrap()
    }
}

impl From<String> for Type {
    fn from(s: String) -> Self {
        s.as_str().parse().unwrap()
    }
}

impl Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trip() {
        let versioned: Type = "oci/v1".parse().unwrap();
        assert_eq!(versioned.to_string(), "oci/v1");
        assert_eq!(versioned.name(), "oci");
        assert_eq!(versioned.version(), Some("v1"));

        let bare: Type = "oci".parse().unwrap();
        assert_eq!(bare.to_string(), "oci");
        assert!(!bare.is_versioned());
    }

    #[test]
    fn equality_is_structural() {
        assert_ne!(Type::new("oci"), Type::with_version("oci", "v1"));
        assert_eq!(
            Type::with_version("oci", "v1"),
            Type::with_version("oci", "v1")
        );
    }

    #[test]
    fn unversioned_strips_version() {
        let t = Type::with_version("oci", "v1");
        assert_eq!(t.unversioned(), Type::new("oci"));
    }

    #[test]
    fn serde_round_trip() {
        let t = Type::with_version("oci", "v1");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"oci/v1\"");
        let back: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
