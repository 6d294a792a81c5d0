//! Command transports.
//!
//! Every transport drains whatever input is available without blocking and
//! hands back complete lines tagged with their sender, so the command core can
//! reply to the right peer. The [`Driver`] enum closes over the three concrete
//! transports for the common case; [`CommandTransport`] is the seam tests and
//! embedders can implement themselves.

mod datagram;
mod driver;
mod line_buffer;
#[cfg(unix)]
mod local;
mod network;
mod stdin;
mod transport;

pub use datagram::{request_reply, send_datagram};
pub use driver::Driver;
pub use line_buffer::{LineBuffer, MAX_LINE_LEN, split_datagram};
#[cfg(unix)]
pub use local::LocalSocketTransport;
pub use network::NetworkTransport;
pub use stdin::{ConsoleInput, StdinTransport};
pub use transport::{CommandTransport, ReceivedLine, Sender, TransportKind};
