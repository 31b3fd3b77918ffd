//! Adapter for the input-processing capability.

use async_trait::async_trait;
use ocm_plugins_transport::Location;
use serde_json::Value;

use crate::base::AdapterBase;
use crate::error::AdapterResult;
use crate::traits::InputProcessor;
use crate::types::{ProcessInput, ProcessInputResult};

/// Wraps an external input-processor plugin.
pub struct PluginInputProcessor(pub AdapterBase);

#[async_trait]
impl InputProcessor for PluginInputProcessor {
    async fn process_resource(&self, spec: &Value) -> AdapterResult<(Location, Value)> {
        let body = ProcessInput { spec: spec.clone() };
        let result: ProcessInputResult = self.0.validated_post("/input/resource", spec, &body).await?;
        Ok((result.location, result.descriptor))
    }

    async fn process_source(&self, spec: &Value) -> AdapterResult<(Location, Value)> {
        let body = ProcessInput { spec: spec.clone() };
        let result: ProcessInputResult = self.0.validated_post("/input/source", spec, &body).await?;
        Ok((result.location, result.descriptor))
    }
}
