//! Core data model shared by the OCM plugin host and its plugins.
//!
//! This crate has no knowledge of processes, transports, or schemas — it only
//! defines the [`Type`] identifier, the [`Scheme`] registry that maps a `Type`
//! to a concrete Rust shape, the [`Raw`] envelope used whenever the host does
//! not link a concrete shape for a value, and the [`Identity`] attribute map
//! used for credential and resource matching.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod scheme;
pub mod typ;

pub use canonical::canonicalize;
pub use error::{CoreError, CoreResult};
pub use identity::{Identity, Matcher, match_any, path_match, subset, url_match};
pub use scheme::{Raw, Scheme, SchemeObject, Typed, TypedValue};
pub use typ::Type;
