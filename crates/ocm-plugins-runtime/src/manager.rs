//! Plugin Manager: the single discovery entry point that walks a
//! plugin directory, runs each candidate's `capabilities` invocation, and
//! dispatches the parsed manifest to the right capability registry.

use std::path::{Path, PathBuf};

use ocm_plugins_core::Type;
use ocm_plugins_registry::PluginRecord;
use ocm_plugins_sdk::{PluginSpec, SupportedType};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::OcmConfig;
use crate::error::{ManagerError, ManagerResult};
use crate::registries::{Registries, kinds};

/// Options narrowing what `register_plugins` discovers. The zero-value
/// default walks every extensionless file in the directory.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// When set, only candidates whose file name appears here are
    /// considered; all others are skipped without running `capabilities`.
    /// Primarily useful for integration tests that seed a fixture directory
    /// alongside unrelated files.
    pub only: Option<Vec<String>>,
}

/// A capability spec's body once its `kind` (the `type` field) has been
/// pulled out via [`ocm_plugins_core::Raw::get_type`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CapabilityBody {
    supported_types: Vec<SupportedType>,
    #[serde(flatten)]
    #[allow(dead_code)]
    extra: Value,
}

/// Walks `dir` (non-recursive) for plugin candidates, runs each one's
/// `capabilities` invocation, and registers every declared capability spec
/// with the matching registry in `registries`. Returns the ids of every
/// plugin successfully registered.
///
/// This is the Plugin Manager's one discovery entry point: there is
/// no second, near-duplicate path into registration.
pub async fn register_plugins(dir: &Path, options: &RegisterOptions, config: &OcmConfig, registries: &Registries) -> ManagerResult<Vec<String>> {
    let mut registered = Vec::new();

    for candidate in discover_candidates(dir)? {
        let plugin_id = candidate.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

        if let Some(only) = &options.only
            && !only.contains(&plugin_id)
        {
            continue;
        }

        register_one(&plugin_id, &candidate, config, registries).await?;
        registered.push(plugin_id);
    }

    Ok(registered)
}

fn discover_candidates(dir: &Path) -> ManagerResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| ManagerError::DirectoryRead { dir: dir.display().to_string(), source })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ManagerError::DirectoryRead { dir: dir.display().to_string(), source })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_none() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}

async fn register_one(plugin_id: &str, path: &Path, config: &OcmConfig, registries: &Registries) -> ManagerResult<()> {
    let manifest_bytes = ocm_plugins_transport::run_capabilities(plugin_id, path).await?;
    let manifest: PluginSpec = serde_json::from_slice(&manifest_bytes).map_err(|e| ManagerError::ManifestInvalid {
        candidate: plugin_id.to_string(),
        reason: e.to_string(),
    })?;

    check_config_requirements(plugin_id, &manifest.supported_config_types, config)?;

    // A plugin may declare more than one capability spec for the same kind
    // (one `register()` call per supported type, in the common SDK usage).
    // Those all resolve to the same registry and must reach it through a
    // single `add_plugin` call, since each call mints a fresh plugin handle
    // and a second one for the same plugin id would spawn a second process.
    let mut by_kind: std::collections::HashMap<String, Vec<Type>> = std::collections::HashMap::new();

    for raw in &manifest.capability_specs {
        let kind = raw.get_type();
        let body: CapabilityBody = raw.decode().map_err(|e| ManagerError::ManifestInvalid {
            candidate: plugin_id.to_string(),
            reason: e.to_string(),
        })?;

        for supported in &body.supported_types {
            if let Some(schema) = &supported.json_schema {
                registries.schema.declare(plugin_id, &supported.ty, schema.clone());
            }
        }

        by_kind.entry(kind.name().to_string()).or_default().extend(body.supported_types.iter().map(|s| s.ty.clone()));
    }

    for (kind, types) in by_kind {
        let record = PluginRecord { id: plugin_id.to_string(), path: path.to_path_buf() };

        match kind.as_str() {
            kinds::COMPONENT_VERSION_REPOSITORY => registries.component_version.add_plugin(record, &types)?,
            kinds::RESOURCE_REPOSITORY => registries.resource.add_plugin(record, &types)?,
            kinds::CREDENTIAL_REPOSITORY => registries.credential.add_plugin(record, &types)?,
            kinds::INPUT_PROCESSOR => registries.input.add_plugin(record, &types)?,
            kinds::DIGEST_PROCESSOR => registries.digest.add_plugin(record, &types)?,
            kinds::SIGNER => registries.signer.add_plugin(record, &types)?,
            kinds::BLOB_TRANSFORMER => registries.blob.add_plugin(record, &types)?,
            kinds::LISTER => registries.lister.add_plugin(record, &types)?,
            other => {
                return Err(ManagerError::UnknownCapabilityKind {
                    plugin_id: plugin_id.to_string(),
                    kind: other.to_string(),
                });
            }
        }

        info!(plugin_id, kind, types = types.len(), "registered capability kind");
    }

    Ok(())
}

fn check_config_requirements(plugin_id: &str, supported_config_types: &[Type], config: &OcmConfig) -> ManagerResult<()> {
    for ty in supported_config_types {
        let has_match = config.config_entries.iter().any(|entry| &entry.ty == ty);
        if !has_match {
            warn!(plugin_id, config_type = %ty, "plugin's required config type has no active configuration entry");
            return Err(ManagerError::MissingRequiredConfig {
                plugin_id: plugin_id.to_string(),
                ty: ty.to_string(),
            });
        }
    }
    Ok(())
}
