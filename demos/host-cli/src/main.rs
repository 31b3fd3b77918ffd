//! Minimal plugin host.
//!
//! ```bash
//! host-cli [plugin-dir]
//! ```
//!
//! Loads the host's own configuration (`ocm-plugins.yaml` if present),
//! installs logging, discovers every plugin candidate in `plugin-dir`
//! (default: `./plugins`), and prints what was registered. Demonstrates the
//! full discovery → registry → shutdown sequence, not a production host.

use std::path::PathBuf;
use std::time::Duration;

use ocm_plugins_adapters::ComponentVersionStore;
use ocm_plugins_core::Type;
use ocm_plugins_runtime::build_component_version_fallback;
use ocm_plugins_runtime::config::load_config;
use ocm_plugins_runtime::{RegisterOptions, Registries, register_plugins};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    ocm_plugins_runtime::logging::init_from_level(&config.global.log_level);

    let plugin_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.global.plugin_dir.clone())
        .unwrap_or_else(|| PathBuf::from("./plugins"));

    info!(dir = %plugin_dir.display(), "discovering plugins");

    let registries = Registries::new();
    let ids = register_plugins(&plugin_dir, &RegisterOptions::default(), &config, &registries).await?;

    if ids.is_empty() {
        info!("no plugins registered");
    } else {
        for id in &ids {
            info!(plugin_id = %id, "registered");
        }
    }

    // Demonstrate a real dispatch: if anything registered for the reference
    // demo plugin's domain type, start it and fetch a descriptor from it.
    match registries.component_version.get(&Type::with_version("memory", "v1")).await {
        Ok(store) => match store.get(&serde_json::json!({}), "demo-component", "1.0.0").await {
            Ok(descriptor) => info!(%descriptor, "fetched descriptor from memory/v1 plugin"),
            Err(e) => warn!(error = %e, "memory/v1 plugin has no 'demo-component' descriptor yet"),
        },
        Err(e) => info!(error = %e, "no memory/v1 component-version plugin registered"),
    }

    // If the active configuration names a fallback chain, wire it and
    // resolve one read through it so the chain is actually exercised rather
    // than left declared-but-unused.
    match build_component_version_fallback(&registries, &config.component_version_fallback, config.global.fallback_concurrency).await {
        Ok(Some(fallback)) => match fallback.get("demo-component", "1.0.0").await {
            Ok(Some(descriptor)) => info!(%descriptor, "fallback chain resolved 'demo-component'"),
            Ok(None) => info!("fallback chain has no 'demo-component' in any configured route"),
            Err(e) => warn!(error = %e, "fallback chain read failed"),
        },
        Ok(None) => {}
        Err(e) => warn!(error = %e, "failed to build component-version fallback chain"),
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received ctrl-c, shutting down"),
    }

    let shutdown_timeout = Duration::from_secs(config.global.shutdown_timeout_secs);
    registries.shutdown(shutdown_timeout).await;

    Ok(())
}
