//! Adapter for the blob-transformer capability.

use async_trait::async_trait;
use ocm_plugins_transport::Location;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::BlobTransformer;
use crate::types::{BlobResult, TransformBlob};

/// Wraps an external blob-transformer plugin.
pub struct PluginBlobTransformer(pub AdapterBase);

#[async_trait]
impl BlobTransformer for PluginBlobTransformer {
    async fn transform(&self, blob: &Location, spec: &Value) -> AdapterResult<Location> {
        let body = TransformBlob {
            blob: blob.clone(),
            spec: spec.clone(),
        };
        let result: BlobResult = self.0.validated_post("/transform-blob", spec, &body).await?;
        Ok(result.blob)
    }

    async fn identity(&self, blob: &Location, spec: &Value) -> AdapterResult<Location> {
        let body = TransformBlob {
            blob: blob.clone(),
            spec: spec.clone(),
        };
        let result: BlobResult = self.0.validated_post("/identity", spec, &body).await?;
        Ok(result.blob)
    }
}
