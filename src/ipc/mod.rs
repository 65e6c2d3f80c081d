//! Named-pipe IPC transport between the TSF shim process and this host.
//!
//! ```text
//! TSF shim (per-app process) ──pipe──▶ suyan-host ──▶ SessionRegistry
//! ```
//!
//! Each client owns one pipe connection; requests on that connection are
//! strictly sequential (no pipelining), though the server accepts many
//! connections concurrently. See [`protocol`] for the wire format and
//! [`server::serve_connection`] for the per-connection dispatch loop.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{Command, Message, Response, PIPE_NAME};
pub use server::{serve_connection, EngineSessionFactory};
pub use transport::{Connection, FramedConnection, TransportError};
