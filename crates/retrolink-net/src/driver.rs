//! Closed set of the built-in transports.

use retrolink_types::error::Result;

#[cfg(unix)]
use crate::local::LocalSocketTransport;
use crate::network::NetworkTransport;
use crate::stdin::StdinTransport;
use crate::transport::{CommandTransport, ReceivedLine, Sender, TransportKind};

/// One of the built-in transports, dispatched statically.
pub enum Driver {
    Network(NetworkTransport),
    Stdin(StdinTransport),
    #[cfg(unix)]
    LocalSocket(LocalSocketTransport),
}

impl CommandTransport for Driver {
    fn kind(&self) -> TransportKind {
        match self {
            Self::Network(t) => t.kind(),
            Self::Stdin(t) => t.kind(),
            #[cfg(unix)]
            Self::LocalSocket(t) => t.kind(),
        }
    }

    fn poll(&mut self) -> Result<Vec<ReceivedLine>> {
        match self {
            Self::Network(t) => t.poll(),
            Self::Stdin(t) => t.poll(),
            #[cfg(unix)]
            Self::LocalSocket(t) => t.poll(),
        }
    }

    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()> {
        match self {
            Self::Network(t) => t.reply(to, payload),
            Self::Stdin(t) => t.reply(to, payload),
            #[cfg(unix)]
            Self::LocalSocket(t) => t.reply(to, payload),
        }
    }
}

impl From<NetworkTransport> for Driver {
    fn from(t: NetworkTransport) -> Self {
        Self::Network(t)
    }
}

impl From<StdinTransport> for Driver {
    fn from(t: StdinTransport) -> Self {
        Self::Stdin(t)
    }
}

#[cfg(unix)]
impl From<LocalSocketTransport> for Driver {
    fn from(t: LocalSocketTransport) -> Self {
        Self::LocalSocket(t)
    }
}
