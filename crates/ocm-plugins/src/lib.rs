//! # OCM Plugins
//!
//! A host-side library for the Open Component Model plugin protocol: out-of-process
//! capability plugins spoken to over a small JSON-RPC-shaped IPC contract,
//! surfaced to callers as narrow, typed Rust traits.
//!
//! ## Overview
//!
//! A plugin is a separate executable. The host discovers it in a plugin
//! directory, asks it for its manifest (`capabilities`), and — on first
//! actual use of one of its declared capabilities — starts it as a
//! long-running server reachable over a Unix domain socket or loopback TCP.
//! Every subsequent call down one of the eight capability traits is a single
//! IPC round trip, validated against the capability's declared JSON Schema
//! before it ever reaches the wire.
//!
//! ```text
//! ┌──────────────┐  discover + dispatch   ┌────────────┐   IPC    ┌─────────┐
//! │ Plugin Manager│──────────────────────▶│  Registry  │─────────▶│ Plugin  │
//! │ (register_plugins) │                  │ (per kind) │          │ process │
//! └──────────────┘                        └────────────┘          └─────────┘
//!                                                │
//!                                                ▼
//!                                     Arc<dyn ComponentVersionStore>
//!                                     Arc<dyn ResourceStore>
//!                                     Arc<dyn CredentialRepository>
//!                                     ... (8 capability traits)
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ocm_plugins::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ocm_plugins::config::load_config()?;
//!     ocm_plugins::logging::init_from_level(&config.global.log_level);
//!
//!     let registries = Registries::new();
//!     register_plugins(
//!         config.global.plugin_dir.as_deref().unwrap_or_else(|| std::path::Path::new("./plugins")),
//!         &RegisterOptions::default(),
//!         &config,
//!         &registries,
//!     ).await?;
//!
//!     let store = registries.component_version.get(&Type::with_version("oci", "v1")).await?;
//!     let descriptor = store.get(&serde_json::json!({}), "my-component", "1.0.0").await?;
//!
//!     registries.shutdown(std::time::Duration::from_secs(5)).await;
//!     Ok(())
//! }
//! ```

pub use ocm_plugins_core::{Identity, Raw, Scheme, Type, Typed};
pub use ocm_plugins_runtime::config;
pub use ocm_plugins_runtime::logging;
pub use ocm_plugins_runtime::{ManagerError, ManagerResult, RegisterOptions, Registries, register_plugins};

/// Convenient re-exports for building a plugin host.
pub mod prelude {
    // Discovery and dispatch.
    pub use ocm_plugins_runtime::{ManagerError, ManagerResult, RegisterOptions, Registries, register_plugins};

    // Host configuration and logging.
    pub use ocm_plugins_runtime::config::{ConfigEntry, GlobalConfig, OcmConfig, load_config};
    pub use ocm_plugins_runtime::logging::{LoggingBuilder, init_from_level};

    // Builtin registration.
    pub use ocm_plugins_builtin::{BuiltinModule, register_builtin};

    // The eight narrow capability traits every adapter implements.
    pub use ocm_plugins_adapters::{
        AdapterError, AdapterResult, BlobTransformer, ComponentVersionStore, CredentialRepository, DigestProcessor, InputProcessor, Lister,
        ResourceStore, Signer,
    };

    // Core identifiers shared across the wire contract.
    pub use ocm_plugins_core::{Identity, Raw, Type};
}
