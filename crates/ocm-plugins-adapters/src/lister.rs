//! Adapter for the component-lister capability.

use async_trait::async_trait;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::Lister;
use crate::types::ComponentPage;

/// Wraps an external component-lister plugin.
pub struct PluginLister(pub AdapterBase);

#[async_trait]
impl Lister for PluginLister {
    async fn list(&self, continuation_token: Option<&str>) -> AdapterResult<(Vec<String>, Option<String>)> {
        let query: &[(&str, &str)] = match continuation_token {
            Some(token) => &[("continuationToken", token)],
            None => &[],
        };
        let page: ComponentPage = self.0.get_json("/list", query, None).await?;
        Ok((page.components, page.continuation_token))
    }
}
