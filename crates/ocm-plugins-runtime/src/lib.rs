//! Plugin Manager plus the ambient stack: host configuration
//! loading and logging setup.
//!
//! [`manager::register_plugins`] is the single discovery entry point: walk
//! a plugin directory, run each candidate's `capabilities` invocation,
//! validate its `supportedConfigTypes` against the active [`config::OcmConfig`],
//! and dispatch each declared capability spec into the matching
//! [`registries::Registries`] registry.

pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod manager;
pub mod registries;

pub use error::{ManagerError, ManagerResult};
pub use fallback::build_component_version_fallback;
pub use manager::{RegisterOptions, register_plugins};
pub use registries::Registries;
