//! UDP command transport.

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use retrolink_types::error::{LinkError, Result};

use crate::line_buffer::split_datagram;
use crate::transport::{CommandTransport, ReceivedLine, Sender, TransportKind};

/// Largest datagram accepted. Longer datagrams are truncated by the OS.
const MAX_DATAGRAM_LEN: usize = 4096;

/// Datagrams read per poll by default. Anything past this waits in the
/// socket buffer for the next frame.
const MAX_DATAGRAMS_PER_POLL: usize = 256;

/// Datagram command transport bound to a local port.
///
/// Each datagram carries one or more lines; its end terminates the last one.
/// Replies go to the source address of the line being answered.
#[derive(Debug)]
pub struct NetworkTransport {
    socket: UdpSocket,
    max_per_poll: usize,
}

impl NetworkTransport {
    /// Bind on all IPv4 interfaces.
    pub fn new(port: u16) -> Result<Self> {
        Self::bind(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
    }

    /// Bind to `addr:port` and switch the socket to non-blocking mode.
    ///
    /// Port 0 picks an ephemeral port; see [`NetworkTransport::local_addr`].
    pub fn bind(addr: IpAddr, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(SocketAddr::new(addr, port))
            .map_err(|e| LinkError::Transport(format!("bind {addr}:{port}: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| LinkError::Transport(format!("set_nonblocking: {e}")))?;
        log::info!("network command transport listening on {addr}:{port}");
        Ok(Self {
            socket,
            max_per_poll: MAX_DATAGRAMS_PER_POLL,
        })
    }

    /// Read at most `max` datagrams per poll.
    pub fn with_datagram_limit(mut self, max: usize) -> Self {
        self.max_per_poll = max.max(1);
        self
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl CommandTransport for NetworkTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Network
    }

    fn poll(&mut self) -> Result<Vec<ReceivedLine>> {
        let mut lines = Vec::new();
        let mut buf = [0u8; MAX_DATAGRAM_LEN];
        let mut received = 0;
        while received < self.max_per_poll {
            match self.socket.recv_from(&mut buf) {
                Ok((n, from)) => {
                    received += 1;
                    lines.extend(
                        split_datagram(&buf[..n])
                            .into_iter()
                            .map(|text| ReceivedLine::new(text, Sender::Datagram(from))),
                    );
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                // An earlier reply hit a closed port (reported on Windows).
                Err(e) if e.kind() == ErrorKind::ConnectionReset => continue,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(LinkError::Transport(format!("recv: {e}"))),
            }
        }
        Ok(lines)
    }

    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()> {
        let Sender::Datagram(addr) = to else {
            return Err(LinkError::Transport(format!(
                "network transport cannot reply to {to}"
            )));
        };
        self.socket
            .send_to(payload, addr)
            .map_err(|e| LinkError::Transport(format!("send to {addr}: {e}")))?;
        Ok(())
    }
}
