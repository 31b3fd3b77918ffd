//! Adapter for the credential-repository capability.

use async_trait::async_trait;
use ocm_plugins_core::Identity;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::CredentialRepository;
use crate::types::ResolveCredentials;

/// Wraps an external credential-repository plugin.
pub struct PluginCredentialRepository(pub AdapterBase);

#[async_trait]
impl CredentialRepository for PluginCredentialRepository {
    async fn resolve(&self, identity: &Identity, repository_spec: &Value) -> AdapterResult<Identity> {
        let body = ResolveCredentials {
            identity: identity.clone(),
            repository_spec: repository_spec.clone(),
        };
        self.0.validated_post("/credentials/resolve", repository_spec, &body).await
    }
}
