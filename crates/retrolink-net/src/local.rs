//! Local domain socket command transport.
//!
//! A Unix stream listener accepts a handful of clients. Each client gets its
//! own line buffer, and replies go back over the connection that sent the
//! line being answered. A client that half-closes its write side still gets
//! the replies to what it sent before; it is dropped on the following poll.

use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use retrolink_types::error::{LinkError, Result};

use crate::line_buffer::LineBuffer;
use crate::transport::{CommandTransport, ReceivedLine, Sender, TransportKind};

const READ_CHUNK: usize = 1024;

/// A single connected client.
struct LocalClient {
    id: u64,
    stream: UnixStream,
    /// Accumulates partial line data between polls.
    lines: LineBuffer,
    /// The peer stopped sending. Kept until the next poll so replies land.
    closed: bool,
}

/// Unix stream socket command transport.
pub struct LocalSocketTransport {
    listener: UnixListener,
    /// Filesystem path to unlink on drop; `None` for abstract names.
    path: Option<PathBuf>,
    clients: Vec<LocalClient>,
    max_clients: usize,
    next_id: u64,
}

impl LocalSocketTransport {
    /// Bind a listener at `path` accepting up to `max_clients` clients.
    ///
    /// A stale socket file left behind at `path` is removed first. A socket
    /// another process is still listening on, or any other kind of file,
    /// is an error. On Linux, a path beginning with `@`
    /// names a socket in the abstract namespace.
    pub fn bind(path: &Path, max_clients: usize) -> Result<Self> {
        let (listener, owned_path) = bind_listener(path)?;
        if let Err(e) = listener.set_nonblocking(true) {
            if let Some(p) = &owned_path {
                let _ = std::fs::remove_file(p);
            }
            return Err(LinkError::Transport(format!("set_nonblocking: {e}")));
        }
        log::info!("local command socket listening on {}", path.display());
        Ok(Self {
            listener,
            path: owned_path,
            clients: Vec::new(),
            max_clients: max_clients.max(1),
            next_id: 0,
        })
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Accept every pending connection.
    fn accept_pending(&mut self) -> Result<()> {
        loop {
            match self.listener.accept() {
                Ok((stream, _)) => {
                    if self.clients.len() >= self.max_clients {
                        log::warn!(
                            "refusing local command client: {} already connected",
                            self.clients.len()
                        );
                        drop(stream);
                        continue;
                    }
                    if let Err(e) = stream.set_nonblocking(true) {
                        log::warn!("dropping local command client: set_nonblocking: {e}");
                        continue;
                    }
                    let id = self.next_id;
                    self.next_id += 1;
                    log::debug!("local command client #{id} connected");
                    self.clients.push(LocalClient {
                        id,
                        stream,
                        lines: LineBuffer::new(),
                        closed: false,
                    });
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(LinkError::Transport(format!("accept: {e}"))),
            }
        }
    }
}

impl CommandTransport for LocalSocketTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::LocalSocket
    }

    fn poll(&mut self) -> Result<Vec<ReceivedLine>> {
        // Clients that hung up last poll have had their replies by now.
        self.clients.retain(|client| !client.closed);
        self.accept_pending()?;

        let mut lines = Vec::new();
        let mut buf = [0u8; READ_CHUNK];
        for client in &mut self.clients {
            let sender = Sender::Connection(client.id);
            loop {
                match client.stream.read(&mut buf) {
                    Ok(0) => {
                        log::debug!("local command client #{} disconnected", client.id);
                        lines.extend(
                            client
                                .lines
                                .take_tail()
                                .map(|text| ReceivedLine::new(text, sender)),
                        );
                        client.closed = true;
                        break;
                    },
                    Ok(n) => lines.extend(
                        client
                            .lines
                            .push(&buf[..n])
                            .into_iter()
                            .map(|text| ReceivedLine::new(text, sender)),
                    ),
                    Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        log::debug!("local command client #{} read error: {e}", client.id);
                        client.closed = true;
                        break;
                    },
                }
            }
        }
        Ok(lines)
    }

    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()> {
        let Sender::Connection(id) = *to else {
            return Err(LinkError::Transport(format!(
                "local socket transport cannot reply to {to}"
            )));
        };
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| LinkError::Transport(format!("connection #{id} is gone")))?;
        client
            .stream
            .write_all(payload)
            .map_err(|e| LinkError::Transport(format!("send to connection #{id}: {e}")))?;
        Ok(())
    }
}

impl Drop for LocalSocketTransport {
    fn drop(&mut self) {
        self.clients.clear();
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::debug!("could not remove {}: {e}", path.display());
            }
        }
    }
}

/// Bind the listener, returning the filesystem path to clean up, if any.
fn bind_listener(path: &Path) -> Result<(UnixListener, Option<PathBuf>)> {
    #[cfg(target_os = "linux")]
    if let Some(name) = path.to_str().and_then(|s| s.strip_prefix('@')) {
        use std::os::linux::net::SocketAddrExt;
        let addr = std::os::unix::net::SocketAddr::from_abstract_name(name.as_bytes())
            .map_err(|e| LinkError::Transport(format!("abstract name {name}: {e}")))?;
        let listener = UnixListener::bind_addr(&addr)
            .map_err(|e| LinkError::Transport(format!("bind @{name}: {e}")))?;
        return Ok((listener, None));
    }

    remove_stale_socket(path)?;
    let listener = UnixListener::bind(path)
        .map_err(|e| LinkError::Transport(format!("bind {}: {e}", path.display())))?;
    Ok((listener, Some(path.to_path_buf())))
}

fn remove_stale_socket(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => {},
        Ok(_) => {
            return Err(LinkError::Transport(format!(
                "{} exists and is not a socket",
                path.display()
            )));
        },
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    match UnixStream::connect(path) {
        Ok(_) => Err(LinkError::Transport(format!(
            "{} is in use by another listener",
            path.display()
        ))),
        Err(e) if matches!(e.kind(), ErrorKind::ConnectionRefused | ErrorKind::NotFound) => {
            log::debug!("removing stale socket {}", path.display());
            std::fs::remove_file(path)?;
            Ok(())
        },
        Err(e) => Err(LinkError::Transport(format!(
            "checking {}: {e}",
            path.display()
        ))),
    }
}
