//! Local endpoint selection: Unix domain socket preferred, TCP loopback as fallback.

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::{TcpListener, UnixListener};

use crate::error::{TransportError, TransportResult};

/// A chosen local address a plugin server binds to and a client dials.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// A Unix domain socket at the given filesystem path.
    Uds(PathBuf),
    /// A TCP socket on the loopback interface.
    Tcp(SocketAddr),
}

impl Endpoint {
    /// The socket path, if this is a UDS endpoint.
    pub fn socket_path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Uds(p) => Some(p),
            Self::Tcp(_) => None,
        }
    }

    /// The base URL a client should dial to reach this endpoint.
    ///
    /// UDS endpoints have no meaningful host:port; the transport's connector
    /// ignores the authority and dials the socket path directly, so a fixed
    /// placeholder authority is used to keep request URIs well-formed.
    pub fn base_url(&self) -> String {
        match self {
            Self::Uds(_) => "http://plugin.local".to_string(),
            Self::Tcp(addr) => format!("http://{addr}"),
        }
    }
}

/// Which kind of local transport a host instance has settled on. Chosen
/// once via [`probe_transport_kind`] and reused by every plugin's endpoint,
/// so that two plugins starting concurrently never end up split across UDS
/// and TCP within the same host instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Unix domain sockets are available on this host.
    Uds,
    /// UDS is unavailable; every plugin uses loopback TCP instead.
    Tcp,
}

/// Decides, once, whether this host instance can create Unix domain sockets
/// in the system temp directory, preferring UDS over TCP for its lower
/// overhead. Probes with a throwaway bind rather than a real plugin's
/// socket path, since this decision is made before any plugin id is known.
pub async fn probe_transport_kind() -> TransportKind {
    let probe_path = std::env::temp_dir().join(format!("ocm-plugins-transport-probe-{}", std::process::id()));
    let _ = std::fs::remove_file(&probe_path);

    match UnixListener::bind(&probe_path) {
        Ok(listener) => {
            drop(listener);
            let _ = std::fs::remove_file(&probe_path);
            TransportKind::Uds
        }
        Err(_) => TransportKind::Tcp,
    }
}

/// Allocates `plugin_id`'s endpoint for the host's already-decided
/// `kind` — a UDS path under the system temp directory, or an ephemeral TCP
/// loopback port. Does not re-probe which kind is available; that choice was
/// made once per host instance by [`probe_transport_kind`].
pub async fn endpoint_for(plugin_id: &str, kind: TransportKind) -> TransportResult<Endpoint> {
    match kind {
        TransportKind::Uds => {
            let socket_path = std::env::temp_dir().join(format!("{plugin_id}-plugin.socket"));
            if socket_path.exists() {
                let _ = std::fs::remove_file(&socket_path);
            }
            Ok(Endpoint::Uds(socket_path))
        }
        TransportKind::Tcp => match TcpListener::bind(("127.0.0.1", 0)).await {
            Ok(listener) => {
                let addr = listener.local_addr().map_err(|e| TransportError::EndpointUnavailable {
                    plugin_id: plugin_id.to_string(),
                    reason: e.to_string(),
                })?;
                drop(listener);
                Ok(Endpoint::Tcp(addr))
            }
            Err(e) => Err(TransportError::EndpointUnavailable {
                plugin_id: plugin_id.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probes_a_kind_and_allocates_a_matching_endpoint() {
        let kind = probe_transport_kind().await;
        let endpoint = endpoint_for("test-plugin-endpoint", kind).await.unwrap();
        match &endpoint {
            Endpoint::Uds(path) => {
                assert_eq!(kind, TransportKind::Uds);
                assert!(path.to_string_lossy().contains("test-plugin-endpoint"));
            }
            Endpoint::Tcp(addr) => {
                assert_eq!(kind, TransportKind::Tcp);
                assert!(addr.port() > 0);
            }
        }
    }

    #[tokio::test]
    async fn same_kind_is_reused_across_plugins() {
        let kind = probe_transport_kind().await;
        let a = endpoint_for("plugin-a", kind).await.unwrap();
        let b = endpoint_for("plugin-b", kind).await.unwrap();
        assert_eq!(std::mem::discriminant(&a), std::mem::discriminant(&b));
    }

    #[test]
    fn base_url_is_well_formed_for_both_kinds() {
        let tcp = Endpoint::Tcp("127.0.0.1:9999".parse().unwrap());
        assert_eq!(tcp.base_url(), "http://127.0.0.1:9999");

        let uds = Endpoint::Uds(PathBuf::from("/tmp/x-plugin.socket"));
        assert!(uds.base_url().starts_with("http://"));
        assert!(uds.socket_path().is_some());
        assert!(tcp.socket_path().is_none());
    }
}
