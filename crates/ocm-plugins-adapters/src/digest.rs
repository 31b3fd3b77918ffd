//! Adapter for the digest-processor capability.

use async_trait::async_trait;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::DigestProcessor;
use crate::types::ProcessDigest;

/// Wraps an external digest-processor plugin.
pub struct PluginDigestProcessor(pub AdapterBase);

#[async_trait]
impl DigestProcessor for PluginDigestProcessor {
    async fn process(&self, resource: &Value) -> AdapterResult<Value> {
        let body = ProcessDigest { resource: resource.clone() };
        self.0.validated_post("/digest/process", resource, &body).await
    }
}
