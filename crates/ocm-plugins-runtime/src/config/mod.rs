//! Layered configuration loading: search paths, YAML parsing with env-var
//! expansion, and validation.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config};
pub use schema::{ConfigEntry, FallbackRouteConfig, GlobalConfig, OcmConfig};
pub use validation::validate_config;
