//! HTTP client abstraction over the two endpoint kinds a plugin server might
//! be reachable on: a loopback TCP port (via `reqwest`) or a Unix domain
//! socket (via a hand-rolled `hyper_util` legacy client, since `reqwest` has
//! no UDS support).

use std::time::Duration;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::connector::UnixConnector;
use crate::endpoint::Endpoint;
use crate::error::{TransportError, TransportResult};

/// Header carrying the repository specification a request should be scoped
/// to, JSON-encoded.
pub const REPOSITORY_HEADER: &str = "X-Ocm-Repository";

enum Inner {
    Tcp(reqwest::Client),
    Uds {
        client: HyperClient<UnixConnector, http_body_util::Full<Bytes>>,
        base_url: String,
    },
}

/// A client bound to one plugin's running server, addressed over whichever
/// endpoint kind it was started with.
pub struct PluginClient {
    plugin_id: String,
    base_url: String,
    inner: Inner,
}

impl PluginClient {
    /// Builds a client for `endpoint`, belonging to `plugin_id`.
    pub fn new(plugin_id: &str, endpoint: &Endpoint) -> Self {
        let base_url = endpoint.base_url();
        let inner = match endpoint {
            Endpoint::Tcp(_) => Inner::Tcp(
                reqwest::ClientBuilder::new()
                    .timeout(Duration::from_secs(60))
                    .build()
                    .expect("failed to build reqwest client"),
            ),
            Endpoint::Uds(path) => {
                let connector = UnixConnector::new(path.clone());
                let client = HyperClient::builder(TokioExecutor::new()).build(connector);
                Inner::Uds {
                    client,
                    base_url: base_url.clone(),
                }
            }
        };

        Self {
            plugin_id: plugin_id.to_string(),
            base_url,
            inner,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issues a GET against `path` and returns the raw response body.
    pub async fn get_raw(&self, path: &str) -> TransportResult<Bytes> {
        self.request_raw(http::Method::GET, path, None, &[], None, None).await
    }

    /// Issues a GET against `path` with query parameters, decoding the
    /// response body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        repository: Option<&Value>,
        auth: Option<&Value>,
    ) -> TransportResult<T> {
        let bytes = self
            .request_raw(http::Method::GET, path, None, query, repository, auth)
            .await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Issues a POST of `body` (JSON-encoded) against `path`, decoding the
    /// response body as JSON.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        repository: Option<&Value>,
        auth: Option<&Value>,
    ) -> TransportResult<T> {
        let body_bytes = serde_json::to_vec(body)?;
        let bytes = self
            .request_raw(http::Method::POST, path, Some(body_bytes), &[], repository, auth)
            .await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Issues a cancellable POST; resolves to `Cancelled` if `cancel` fires
    /// before the response arrives.
    pub async fn post_json_cancellable<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        repository: Option<&Value>,
        auth: Option<&Value>,
        cancel: &CancellationToken,
    ) -> TransportResult<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled { plugin_id: self.plugin_id.clone() }),
            result = self.post_json(path, body, repository, auth) => result,
        }
    }

    async fn request_raw(
        &self,
        method: http::Method,
        path: &str,
        body: Option<Vec<u8>>,
        query: &[(&str, &str)],
        repository: Option<&Value>,
        auth: Option<&Value>,
    ) -> TransportResult<Bytes> {
        trace!(plugin_id = %self.plugin_id, %path, "plugin request");
        match &self.inner {
            Inner::Tcp(client) => {
                let mut req = client.request(method, self.url(path));
                if !query.is_empty() {
                    req = req.query(query);
                }
                if let Some(repo) = repository {
                    req = req.header(REPOSITORY_HEADER, serde_json::to_string(repo)?);
                }
                if let Some(creds) = auth {
                    req = req.header(http::header::AUTHORIZATION, serde_json::to_string(creds)?);
                }
                if let Some(b) = body {
                    req = req.header(http::header::CONTENT_TYPE, "application/json").body(b);
                }
                let resp = req
                    .send()
                    .await
                    .map_err(|e| TransportError::RequestFailed { plugin_id: self.plugin_id.clone(), reason: e.to_string() })?;
                let status = resp.status();
                let bytes = resp
                    .bytes()
                    .await
                    .map_err(|e| TransportError::RequestFailed { plugin_id: self.plugin_id.clone(), reason: e.to_string() })?;
                if !status.is_success() {
                    return Err(TransportError::NonSuccessStatus {
                        plugin_id: self.plugin_id.clone(),
                        status: status.as_u16(),
                        body: String::from_utf8_lossy(&bytes).to_string(),
                    });
                }
                Ok(bytes)
            }
            Inner::Uds { client, base_url } => {
                let mut url = format!("{base_url}{path}");
                if !query.is_empty() {
                    let qs: Vec<String> = query
                        .iter()
                        .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
                        .collect();
                    url = format!("{url}?{}", qs.join("&"));
                }

                let mut builder = http::Request::builder().method(method).uri(url);
                if let Some(repo) = repository {
                    builder = builder.header(REPOSITORY_HEADER, serde_json::to_string(repo)?);
                }
                if let Some(creds) = auth {
                    builder = builder.header(http::header::AUTHORIZATION, serde_json::to_string(creds)?);
                }
                let body_bytes = body.unwrap_or_default();
                if !body_bytes.is_empty() {
                    builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                }
                let request = builder
                    .body(http_body_util::Full::new(Bytes::from(body_bytes)))
                    .map_err(|e| TransportError::RequestFailed { plugin_id: self.plugin_id.clone(), reason: e.to_string() })?;

                let resp = client
                    .request(request)
                    .await
                    .map_err(|e| TransportError::RequestFailed { plugin_id: self.plugin_id.clone(), reason: e.to_string() })?;
                let status = resp.status();
                let bytes = resp
                    .into_body()
                    .collect()
                    .await
                    .map_err(|e| TransportError::RequestFailed { plugin_id: self.plugin_id.clone(), reason: e.to_string() })?
                    .to_bytes();
                if !status.is_success() {
                    return Err(TransportError::NonSuccessStatus {
                        plugin_id: self.plugin_id.clone(),
                        status: status.as_u16(),
                        body: String::from_utf8_lossy(&bytes).to_string(),
                    });
                }
                Ok(bytes)
            }
        }
    }
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_passes_through_unreserved_chars() {
        assert_eq!(urlencode("abcXYZ09-_.~"), "abcXYZ09-_.~");
        assert_eq!(urlencode("a b"), "a%20b");
        assert_eq!(urlencode("oci/v1"), "oci%2Fv1");
    }
}
