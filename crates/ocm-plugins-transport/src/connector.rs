//! A `tower::Service<Uri>` that dials a fixed Unix domain socket, for use with
//! `hyper_util`'s legacy client. `reqwest` has no native UDS support, so the
//! UDS leg of `PluginClient` goes through this connector instead.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use http::Uri;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;

/// Connects every request to the same Unix domain socket path, ignoring the
/// authority component of the URI it's asked to connect for. Callers still
/// build requests against a placeholder `http://plugin.local/...` base URL so
/// that path and query encoding go through the normal `http`/`hyper` types.
#[derive(Debug, Clone)]
pub struct UnixConnector {
    socket_path: PathBuf,
}

impl UnixConnector {
    /// Creates a connector that always dials `socket_path`.
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }
}

impl tower::Service<Uri> for UnixConnector {
    type Response = TokioIo<UnixStream>;
    type Error = std::io::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _uri: Uri) -> Self::Future {
        let socket_path = self.socket_path.clone();
        Box::pin(async move {
            let stream = UnixStream::connect(&socket_path).await?;
            Ok(TokioIo::new(stream))
        })
    }
}
