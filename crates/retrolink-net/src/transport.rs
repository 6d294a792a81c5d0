//! The transport seam between I/O channels and the command core.

use std::fmt;
use std::net::SocketAddr;

use retrolink_types::error::Result;

/// Which kind of channel a transport reads from.
///
/// The declaration order is the fixed order in which slots are polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportKind {
    Network,
    Stdin,
    LocalSocket,
}

impl TransportKind {
    /// All kinds in polling order.
    pub const ALL: [TransportKind; 3] = [Self::Network, Self::Stdin, Self::LocalSocket];

    /// Slot index of this kind.
    pub const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Stdin => write!(f, "stdin"),
            Self::LocalSocket => write!(f, "local socket"),
        }
    }
}

/// Where a line came from, and so where its reply goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// Standard input; replies go to standard output.
    Console,
    /// A datagram source address.
    Datagram(SocketAddr),
    /// A stream connection, by connection id.
    Connection(u64),
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Datagram(addr) => write!(f, "{addr}"),
            Self::Connection(id) => write!(f, "connection #{id}"),
        }
    }
}

/// One complete command line and its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedLine {
    pub text: String,
    pub from: Sender,
}

impl ReceivedLine {
    pub fn new(text: impl Into<String>, from: Sender) -> Self {
        Self {
            text: text.into(),
            from,
        }
    }
}

/// A non-blocking, line-oriented command channel.
///
/// A transport owns its OS resource exclusively and releases it when dropped.
pub trait CommandTransport {
    /// The kind of channel behind this transport.
    fn kind(&self) -> TransportKind;

    /// Drain all currently available input and return the complete lines.
    ///
    /// Must return immediately when nothing is pending. An `Err` means the
    /// channel failed this cycle; the caller processes no commands and polls
    /// again next frame.
    fn poll(&mut self) -> Result<Vec<ReceivedLine>>;

    /// Send `payload` back to `to`. Best effort: delivery is not guaranteed.
    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()>;
}

impl<T: CommandTransport + ?Sized> CommandTransport for Box<T> {
    fn kind(&self) -> TransportKind {
        (**self).kind()
    }

    fn poll(&mut self) -> Result<Vec<ReceivedLine>> {
        (**self).poll()
    }

    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()> {
        (**self).reply(to, payload)
    }
}
