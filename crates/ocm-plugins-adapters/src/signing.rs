//! Adapter for the signing capability.

use async_trait::async_trait;
use ocm_plugins_core::Identity;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::Signer;
use crate::types::{SignPayload, SignerIdentity};

/// Wraps an external signing plugin.
pub struct PluginSigner(pub AdapterBase);

#[async_trait]
impl Signer for PluginSigner {
    async fn sign(&self, descriptor: &Value, spec: &Value) -> AdapterResult<Value> {
        let body = SignPayload {
            descriptor: descriptor.clone(),
            spec: spec.clone(),
        };
        self.0.validated_post("/sign", spec, &body).await
    }

    async fn verify(&self, descriptor: &Value, spec: &Value) -> AdapterResult<()> {
        let body = SignPayload {
            descriptor: descriptor.clone(),
            spec: spec.clone(),
        };
        let _: Value = self.0.validated_post("/verify", spec, &body).await?;
        Ok(())
    }

    async fn signer_identity(&self, spec: &Value) -> AdapterResult<Identity> {
        let body = SignerIdentity { spec: spec.clone() };
        self.0.validated_post("/sign/identity", spec, &body).await
    }

    async fn verifier_identity(&self, spec: &Value) -> AdapterResult<Identity> {
        let body = SignerIdentity { spec: spec.clone() };
        self.0.validated_post("/verify/identity", spec, &body).await
    }
}
