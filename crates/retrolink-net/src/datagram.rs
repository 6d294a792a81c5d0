//! Outbound one-shot datagrams to a network command transport.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use retrolink_types::error::{LinkError, Result};

use crate::line_buffer::MAX_LINE_LEN;

/// Resolve `host:port` and open an unconnected socket of the same family.
///
/// IPv4 results are preferred, since the transport binds IPv4 by default.
fn open_for(host: &str, port: u16) -> Result<(UdpSocket, SocketAddr)> {
    let candidates: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| LinkError::Transport(format!("resolve {host}: {e}")))?
        .collect();
    let target = candidates
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| LinkError::Transport(format!("{host} resolved to no address")))?;
    let local = if target.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };
    let socket = UdpSocket::bind(local)?;
    Ok((socket, target))
}

/// Send `line` (newline appended) to `host:port`. Fire and forget.
pub fn send_datagram(host: &str, port: u16, line: &str) -> Result<()> {
    let (socket, target) = open_for(host, port)?;
    socket
        .send_to(format!("{line}\n").as_bytes(), target)
        .map_err(|e| LinkError::Transport(format!("send to {target}: {e}")))?;
    log::debug!("sent {line:?} to {target}");
    Ok(())
}

/// Send `line` to `host:port` and wait up to `timeout` for one reply.
///
/// Returns `Ok(None)` when nothing arrives in time, which is also what an
/// unrecognized command or a command without a reply looks like.
pub fn request_reply(host: &str, port: u16, line: &str, timeout: Duration) -> Result<Option<String>> {
    let (socket, target) = open_for(host, port)?;
    socket.set_read_timeout(Some(timeout))?;
    socket
        .send_to(format!("{line}\n").as_bytes(), target)
        .map_err(|e| LinkError::Transport(format!("send to {target}: {e}")))?;

    let mut buf = vec![0u8; MAX_LINE_LEN * 4];
    match socket.recv_from(&mut buf) {
        Ok((n, _)) => {
            let reply = String::from_utf8_lossy(&buf[..n]);
            Ok(Some(reply.trim_end_matches(['\r', '\n']).to_string()))
        },
        Err(e)
            if e.kind() == std::io::ErrorKind::WouldBlock
                || e.kind() == std::io::ErrorKind::TimedOut =>
        {
            Ok(None)
        },
        Err(e) => Err(LinkError::Transport(format!("recv from {target}: {e}"))),
    }
}
