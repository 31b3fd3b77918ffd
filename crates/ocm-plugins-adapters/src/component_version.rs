//! Adapter for the component-version-store capability.

use async_trait::async_trait;
use ocm_plugins_core::Identity;
use ocm_plugins_transport::Location;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::ComponentVersionStore;
use crate::types::{UploadComponentVersion, UploadLocalResource};

/// Wraps an external component-version-store plugin.
pub struct PluginComponentVersionStore(pub AdapterBase);

#[async_trait]
impl ComponentVersionStore for PluginComponentVersionStore {
    async fn get(&self, repository: &Value, name: &str, version: &str) -> AdapterResult<Value> {
        self.0
            .get_json(
                "/component-version/download",
                &[("name", name), ("version", version)],
                Some(repository),
            )
            .await
    }

    async fn add(&self, repository: &Value, descriptor: &Value) -> AdapterResult<()> {
        let body = UploadComponentVersion {
            repository: repository.clone(),
            descriptor: descriptor.clone(),
        };
        let _: Value = self.0.validated_post("/component-version/upload", descriptor, &body).await?;
        Ok(())
    }

    async fn download_local_resource(
        &self,
        repository: &Value,
        name: &str,
        version: &str,
        identity: &Identity,
        target: &Location,
    ) -> AdapterResult<()> {
        let identity_json = serde_json::to_vec(identity).map_err(|e| crate::error::AdapterError::MalformedResponse(e.to_string()))?;
        let identity_b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, identity_json);
        let (location_type, location_value) = match target {
            Location::LocalFile { path } => ("localFile", path.display().to_string()),
            Location::UnixNamedPipe { path } => ("unixNamedPipe", path.display().to_string()),
            Location::RemoteUrl { url } => ("remoteUrl", url.clone()),
        };
        let _: Value = self
            .0
            .get_json(
                "/local-resource/download",
                &[
                    ("name", name),
                    ("version", version),
                    ("target_location_type", location_type),
                    ("target_location_value", &location_value),
                    ("identity", &identity_b64),
                ],
                Some(repository),
            )
            .await?;

        if !target_exists(target) {
            return Err(crate::error::AdapterError::MalformedResponse(
                "plugin reported success but target location was not produced".to_string(),
            ));
        }
        Ok(())
    }

    async fn upload_local_resource(
        &self,
        repository: &Value,
        name: &str,
        version: &str,
        resource: &Value,
        resource_location: &Location,
    ) -> AdapterResult<()> {
        let body = UploadLocalResource {
            repository: repository.clone(),
            name: name.to_string(),
            version: version.to_string(),
            resource_location: resource_location.clone(),
            resource: resource.clone(),
        };
        let _: Value = self.0.validated_post("/local-resource/upload", resource, &body).await?;
        Ok(())
    }
}

fn target_exists(location: &Location) -> bool {
    match location {
        Location::LocalFile { path } | Location::UnixNamedPipe { path } => path.exists(),
        Location::RemoteUrl { .. } => true,
    }
}
