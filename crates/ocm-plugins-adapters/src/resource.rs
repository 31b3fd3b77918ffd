//! Adapter for the global resource-store capability.

use async_trait::async_trait;
use ocm_plugins_transport::Location;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::ResourceStore;
use crate::types::ResourceTransfer;

/// Wraps an external resource-store plugin.
pub struct PluginResourceStore(pub AdapterBase);

#[async_trait]
impl ResourceStore for PluginResourceStore {
    async fn download(&self, resource: &Value, target: &Location) -> AdapterResult<()> {
        let body = ResourceTransfer {
            resource: resource.clone(),
            resource_location: Some(target.clone()),
        };
        let _: Value = self.0.validated_post("/resource/download", resource, &body).await?;
        Ok(())
    }

    async fn upload(&self, resource: &Value, resource_location: &Location) -> AdapterResult<()> {
        let body = ResourceTransfer {
            resource: resource.clone(),
            resource_location: Some(resource_location.clone()),
        };
        let _: Value = self.0.validated_post("/resource/upload", resource, &body).await?;
        Ok(())
    }
}
