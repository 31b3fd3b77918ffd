//! Plugin-authoring SDK.
//!
//! A plugin binary built with this crate accumulates its capability routes
//! and manifest entries via [`EndpointBuilder`], then hands the result to
//! [`run`], which implements the two-invocation CLI contract the host
//! expects: `capabilities` (print manifest, exit) and `--config <json>`
//! (serve until SIGINT).

pub mod builder;
pub mod config;
pub mod error;
pub mod manifest;

pub use builder::EndpointBuilder;
pub use config::{ServeConfig, TransportKind};
pub use error::{SdkError, SdkResult};
pub use manifest::{CapabilitySpec, PluginSpec, SupportedType};

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Parses `std::env::args()`, and either prints the manifest (`capabilities`)
/// or serves the router (`--config <json>`) until SIGINT.
pub async fn run(builder: EndpointBuilder) -> SdkResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("capabilities") => {
            let manifest = builder.manifest()?;
            let json = serde_json::to_string(&manifest).map_err(|e| SdkError::ManifestEncoding(e.to_string()))?;
            println!("{json}");
            Ok(())
        }
        Some("--config") => {
            let config_json = args.get(1).ok_or(SdkError::BadInvocation)?;
            let config: ServeConfig = serde_json::from_str(config_json).map_err(|e| SdkError::InvalidConfig(e.to_string()))?;
            serve(builder, config).await
        }
        _ => Err(SdkError::BadInvocation),
    }
}

async fn serve(builder: EndpointBuilder, config: ServeConfig) -> SdkResult<()> {
    let endpoint = match config.transport {
        TransportKind::Unix => ocm_plugins_transport::Endpoint::Uds(PathBuf::from(&config.location)),
        TransportKind::Tcp => ocm_plugins_transport::Endpoint::Tcp(
            config
                .location
                .parse()
                .map_err(|e: std::net::AddrParseError| SdkError::InvalidConfig(e.to_string()))?,
        ),
    };

    let router = builder.into_router();
    let shutdown = CancellationToken::new();
    let shutdown_for_signal = shutdown.clone();
    let plugin_id = config.id.clone();

    info!(plugin_id = %config.id, location = %config.location, "plugin serving");

    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!(plugin_id = %plugin_id, "received SIGINT, shutting down");
        shutdown_for_signal.cancel();
    });

    ocm_plugins_transport::server::serve(endpoint, router, shutdown).await?;
    Ok(())
}
