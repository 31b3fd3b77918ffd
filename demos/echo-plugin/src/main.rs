//! Reference plugin implementing the `componentVersionRepository` capability
//! for a single domain type, `memory/v1`: component-version descriptors and
//! their local resource blobs live entirely in the plugin process's memory.
//!
//! Runnable both as a manual demonstration (`echo-plugin capabilities`,
//! `echo-plugin --config '{...}'`) and as the fixture integration tests spawn
//! as a real child process.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ocm_plugins_core::Type;
use ocm_plugins_sdk::EndpointBuilder;
use ocm_plugins_transport::Location;
use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shape `capabilities` reflects a JSON Schema from. Not itself the wire
/// request/response type — those are the `Value`-carrying envelopes in
/// `ocm_plugins_adapters::types`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ComponentVersionDescriptor {
    name: String,
    version: String,
    #[serde(default)]
    resources: Vec<Value>,
}

#[derive(Default)]
struct Store {
    descriptors: Mutex<HashMap<(String, String), Value>>,
    resource_bytes: Mutex<HashMap<(String, String), Vec<u8>>>,
}

#[derive(Debug, Deserialize)]
struct UploadComponentVersion {
    #[allow(dead_code)]
    repository: Value,
    descriptor: Value,
}

#[derive(Debug, Deserialize)]
struct UploadLocalResource {
    #[allow(dead_code)]
    repository: Value,
    name: String,
    version: String,
    resource_location: Location,
    #[allow(dead_code)]
    resource: Value,
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    name: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct LocalResourceDownloadQuery {
    name: String,
    version: String,
    target_location_type: String,
    target_location_value: String,
}

async fn download(State(store): State<Arc<Store>>, Query(q): Query<DownloadQuery>) -> Result<Json<Value>, axum::http::StatusCode> {
    store
        .descriptors
        .lock()
        .get(&(q.name, q.version))
        .cloned()
        .map(Json)
        .ok_or(axum::http::StatusCode::NOT_FOUND)
}

async fn upload(State(store): State<Arc<Store>>, Json(body): Json<UploadComponentVersion>) -> Json<Value> {
    let name = body.descriptor.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
    let version = body.descriptor.get("version").and_then(Value::as_str).unwrap_or_default().to_string();
    store.descriptors.lock().insert((name, version), body.descriptor.clone());
    Json(body.descriptor)
}

async fn local_resource_download(
    State(store): State<Arc<Store>>,
    Query(q): Query<LocalResourceDownloadQuery>,
) -> Result<Json<Value>, axum::http::StatusCode> {
    let bytes = store
        .resource_bytes
        .lock()
        .get(&(q.name, q.version))
        .cloned()
        .ok_or(axum::http::StatusCode::NOT_FOUND)?;

    if q.target_location_type != "localFile" {
        return Err(axum::http::StatusCode::BAD_REQUEST);
    }
    std::fs::write(&q.target_location_value, &bytes).map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(Value::Object(Default::default())))
}

async fn local_resource_upload(State(store): State<Arc<Store>>, Json(body): Json<UploadLocalResource>) -> Result<Json<Value>, axum::http::StatusCode> {
    let path = match &body.resource_location {
        Location::LocalFile { path } => path,
        _ => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    let bytes = std::fs::read(path).map_err(|_| axum::http::StatusCode::BAD_REQUEST)?;
    store.resource_bytes.lock().insert((body.name, body.version), bytes);
    Ok(Json(Value::Object(Default::default())))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let store = Arc::new(Store::default());
    let routes = Router::new()
        .route("/component-version/download", get(download))
        .route("/component-version/upload", post(upload))
        .route("/local-resource/download", get(local_resource_download))
        .route("/local-resource/upload", post(local_resource_upload))
        .with_state(store);

    let builder = EndpointBuilder::new()
        .register::<ComponentVersionDescriptor>("componentVersionRepository/v1", Type::with_version("memory", "v1"), routes)?;

    ocm_plugins_sdk::run(builder).await?;
    Ok(())
}
