//! Identity attribute maps and the matchers used for credential resolution
//! and resource disambiguation.

use std::collections::HashMap;

/// An unordered `string → string` attribute map.
///
/// Reserved keys used by the built-in matchers: `type`, `hostname`, `scheme`,
/// `port`, `path`. Callers are free to add arbitrary additional keys — they
/// participate in [`subset`] and equality comparisons like any other key.
pub type Identity = HashMap<String, String>;

/// Reserved attribute keys understood by the built-in matchers.
pub mod keys {
    /// The `type` attribute.
    pub const TYPE: &str = "type";
    /// The `hostname` attribute.
    pub const HOSTNAME: &str = "hostname";
    /// The `scheme` attribute.
    pub const SCHEME: &str = "scheme";
    /// The `port` attribute.
    pub const PORT: &str = "port";
    /// The `path` attribute.
    pub const PATH: &str = "path";
}

/// `Subset(a, b)`: every key/value pair of `a` is present in `b`.
pub fn subset(a: &Identity, b: &Identity) -> bool {
    a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| bv == v))
}

/// Shell-style single-segment wildcard match between two `/`-separated paths.
///
/// A `*` component in `pattern` matches exactly one path segment in `value`;
/// all other components must match literally and the segment counts must
/// agree.
fn glob_path_match(pattern: &str, value: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let value_segments: Vec<&str> = value.split('/').collect();
    if pattern_segments.len() != value_segments.len() {
        return false;
    }
    pattern_segments
        .iter()
        .zip(value_segments.iter())
        .all(|(p, v)| *p == "*" || p == v)
}

/// `PathMatch(a, b)`: strips the `path` attribute from both sides, requires
/// equality on the rest, then applies [`glob_path_match`] between `a.path`
/// and `b.path` (if either carries one).
///
/// `a`'s path is treated as the concrete value and `b`'s path as the
/// (possibly wildcarded) pattern, matching the convention that `a` is the
/// identity being looked up and `b` is a registered, possibly-wildcarded
/// entry.
pub fn path_match(a: &Identity, b: &Identity) -> bool {
    let non_path_equal = a
        .iter()
        .filter(|(k, _)| k.as_str() != keys::PATH)
        .all(|(k, v)| b.get(k).is_some_and(|bv| bv == v))
        && b.iter()
            .filter(|(k, _)| k.as_str() != keys::PATH)
            .all(|(k, v)| a.get(k).is_some_and(|av| av == v));

    if !non_path_equal {
        return false;
    }

    match (a.get(keys::PATH), b.get(keys::PATH)) {
        (Some(av), Some(bv)) => glob_path_match(bv, av),
        (None, None) => true,
        _ => false,
    }
}

/// Normalizes default ports out of an identity before comparison:
/// `scheme=https, port=443` and `scheme=http, port=80` have their `port`
/// attribute dropped.
fn normalize_url_identity(id: &Identity) -> Identity {
    let mut out = id.clone();
    let is_default_port = match (out.get(keys::SCHEME).map(String::as_str), out.get(keys::PORT).map(String::as_str)) {
        (Some("https"), Some("443")) => true,
        (Some("http"), Some("80")) => true,
        _ => false,
    };
    if is_default_port {
        out.remove(keys::PORT);
    }
    out
}

/// `URLMatch(a, b)`: normalizes default ports out of both identities, then
/// requires full equality of the remaining attributes. Used when resolving
/// credentials for URL-keyed resources.
pub fn url_match(a: &Identity, b: &Identity) -> bool {
    normalize_url_identity(a) == normalize_url_identity(b)
}

/// A named identity matcher, usable standalone or composed via [`Matcher::and`].
pub trait IdentityMatcher: Send + Sync {
    /// Returns whether `a` matches `b` under this matcher's rule.
    fn is_match(&self, a: &Identity, b: &Identity) -> bool;
}

impl<F> IdentityMatcher for F
where
    F: Fn(&Identity, &Identity) -> bool + Send + Sync,
{
    fn is_match(&self, a: &Identity, b: &Identity) -> bool {
        self(a, b)
    }
}

/// A boxed, composable matcher chain.
///
/// `Matcher::new(path_match).and(equal)` composes sub-matchers with logical
/// AND; [`match_any`] composes top-level chains with logical OR. The default
/// matcher set used when none is supplied is `PathMatch ∧ Equal`.
pub struct Matcher {
    chain: Vec<Box<dyn IdentityMatcher>>,
}

impl Matcher {
    /// Starts a new chain with a single matcher.
    pub fn new<M: IdentityMatcher + 'static>(m: M) -> Self {
        Self {
            chain: vec![Box::new(m)],
        }
    }

    /// Appends a matcher that must *also* agree (logical AND).
    pub fn and<M: IdentityMatcher + 'static>(mut self, m: M) -> Self {
        self.chain.push(Box::new(m));
        self
    }

    /// The default chain: path-based matching AND exact attribute equality.
    pub fn default_chain() -> Self {
        Matcher::new(path_match).and(|a: &Identity, b: &Identity| a == b)
    }
}

impl IdentityMatcher for Matcher {
    fn is_match(&self, a: &Identity, b: &Identity) -> bool {
        self.chain.iter().all(|m| m.is_match(a, b))
    }
}

/// `Match(a, b, matchers…)`: logical OR across the given matcher chains.
///
/// Returns `true` as soon as any matcher agrees; `false` (vacuously) if
/// `matchers` is empty.
pub fn match_any(a: &Identity, b: &Identity, matchers: &[&dyn IdentityMatcher]) -> bool {
    matchers.iter().any(|m| m.is_match(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(pairs: &[(&str, &str)]) -> Identity {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn subset_reflexive() {
        let a = id(&[("type", "oci"), ("hostname", "example.com")]);
        assert!(subset(&a, &a));
    }

    #[test]
    fn subset_requires_matching_value() {
        let a = id(&[("type", "oci")]);
        let b = id(&[("type", "docker")]);
        assert!(!subset(&a, &b));
    }

    #[test]
    fn path_match_reflexive() {
        let a = id(&[("path", "x/y/z")]);
        assert!(path_match(&a, &a));
    }

    #[test]
    fn path_match_glob_is_directional() {
        let concrete = id(&[("path", "x/y/z")]);
        let wildcard = id(&[("path", "x/*/z")]);
        assert!(path_match(&concrete, &wildcard));
        assert!(!path_match(&wildcard, &concrete));
    }

    #[test]
    fn path_match_requires_same_segment_count() {
        let a = id(&[("path", "x/y/z")]);
        let b = id(&[("path", "x/*")]);
        assert!(!path_match(&a, &b));
    }

    #[test]
    fn url_match_normalizes_default_ports() {
        let a = id(&[("scheme", "https"), ("port", "443"), ("hostname", "h")]);
        let b = id(&[("scheme", "https"), ("hostname", "h")]);
        assert!(url_match(&a, &b));
    }

    #[test]
    fn url_match_keeps_non_default_ports() {
        let a = id(&[("scheme", "https"), ("port", "8443"), ("hostname", "h")]);
        let b = id(&[("scheme", "https"), ("hostname", "h")]);
        assert!(!url_match(&a, &b));
    }

    #[test]
    fn match_any_is_logical_or() {
        let a = id(&[("path", "x/y")]);
        let b = id(&[("path", "a/b")]);
        let always_false: fn(&Identity, &Identity) -> bool = |_, _| false;
        assert!(!match_any(&a, &b, &[&always_false]));

        let always_true: fn(&Identity, &Identity) -> bool = |_, _| true;
        assert!(match_any(&a, &b, &[&always_false, &always_true]));
    }

    #[test]
    fn default_chain_matches_identical_identities() {
        let a = id(&[("path", "x/y"), ("type", "oci")]);
        assert!(Matcher::default_chain().is_match(&a, &a));
    }
}
