//! Local IPC transport for the OCM plugin host.
//!
//! Every plugin runs as a separate process and is reached over a local-only
//! transport: a Unix domain socket when available, a loopback TCP port
//! otherwise. This crate owns endpoint selection, the HTTP client and server
//! halves of that transport, process lifecycle (spawn, health probe, log
//! relay, graceful shutdown), and the `Location` type used to hand off blob
//! content out-of-band from the JSON request/response bodies.

pub mod client;
pub mod connector;
pub mod endpoint;
pub mod error;
pub mod health;
pub mod location;
pub mod logrelay;
pub mod process;
pub mod server;

pub use client::PluginClient;
pub use endpoint::{Endpoint, TransportKind, endpoint_for, probe_transport_kind};
pub use error::{TransportError, TransportResult};
pub use health::{DEFAULT_START_DEADLINE, wait_for_health};
pub use location::Location;
pub use process::{PluginProcess, drain_stderr, run_capabilities};
