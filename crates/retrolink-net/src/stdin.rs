//! Standard input command transport.
//!
//! On Unix the descriptor is checked with `poll(2)` before every read and
//! read directly, bypassing the buffered `io::stdin()` handle. Its flags are
//! never changed, so a terminal or pipe shared with other processes keeps
//! blocking semantics. Other platforms have no portable readiness check, so
//! construction fails there.

use std::io::{self, ErrorKind, Read, Write};

use retrolink_types::error::{LinkError, Result};

use crate::line_buffer::LineBuffer;
use crate::transport::{CommandTransport, ReceivedLine, Sender, TransportKind};

const READ_CHUNK: usize = 1024;

/// The process's standard input, read only when a read cannot block.
///
/// Returns `WouldBlock` when nothing is waiting.
#[derive(Debug, Default)]
pub struct ConsoleInput {
    _private: (),
}

#[cfg(unix)]
impl Read for ConsoleInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !fd_readable(libc::STDIN_FILENO)? {
            return Err(ErrorKind::WouldBlock.into());
        }
        read_fd(libc::STDIN_FILENO, buf)
    }
}

#[cfg(not(unix))]
impl Read for ConsoleInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(ErrorKind::Unsupported.into())
    }
}

/// Line-buffered command transport over a console-like reader.
///
/// Replies are written to the paired writer (standard output by default).
pub struct StdinTransport<R: Read = ConsoleInput, W: Write = io::Stdout> {
    reader: R,
    writer: W,
    lines: LineBuffer,
    /// Set once the reader reports end of file.
    closed: bool,
}

impl StdinTransport {
    /// Take over the process's standard input and output.
    #[cfg(unix)]
    pub fn new() -> Result<Self> {
        fd_readable(libc::STDIN_FILENO)
            .map_err(|e| LinkError::Transport(format!("stdin: {e}")))?;
        log::info!("stdin command transport enabled");
        Ok(Self::with_io(ConsoleInput::default(), io::stdout()))
    }

    #[cfg(not(unix))]
    pub fn new() -> Result<Self> {
        Err(LinkError::Unsupported(
            "non-blocking standard input on this platform".to_string(),
        ))
    }
}

impl<R: Read, W: Write> StdinTransport<R, W> {
    /// Use an arbitrary reader and writer.
    ///
    /// The reader must not block: it should return `WouldBlock` when it has
    /// nothing to give.
    pub fn with_io(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            lines: LineBuffer::new(),
            closed: false,
        }
    }

    /// Whether the reader has reached end of file.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The reply writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: Read, W: Write> CommandTransport for StdinTransport<R, W> {
    fn kind(&self) -> TransportKind {
        TransportKind::Stdin
    }

    fn poll(&mut self) -> Result<Vec<ReceivedLine>> {
        if self.closed {
            return Ok(Vec::new());
        }

        let mut lines = Vec::new();
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    log::info!("stdin reached end of file; no further commands");
                    self.closed = true;
                    lines.extend(
                        self.lines
                            .take_tail()
                            .map(|text| ReceivedLine::new(text, Sender::Console)),
                    );
                    break;
                },
                Ok(n) => lines.extend(
                    self.lines
                        .push(&buf[..n])
                        .into_iter()
                        .map(|text| ReceivedLine::new(text, Sender::Console)),
                ),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(LinkError::Transport(format!("stdin read: {e}"))),
            }
        }
        Ok(lines)
    }

    fn reply(&mut self, to: &Sender, payload: &[u8]) -> Result<()> {
        if *to != Sender::Console {
            return Err(LinkError::Transport(format!(
                "stdin transport cannot reply to {to}"
            )));
        }
        self.writer.write_all(payload)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Whether a read on `fd` would return without blocking.
///
/// Hang-up and error conditions count as readable: the read that follows
/// reports them.
#[cfg(unix)]
fn fd_readable(fd: libc::c_int) -> io::Result<bool> {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    loop {
        // SAFETY: one valid pollfd, zero timeout.
        let ready = unsafe { libc::poll(&mut pollfd, 1, 0) };
        if ready >= 0 {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() != ErrorKind::Interrupted {
            return Err(err);
        }
    }
    if pollfd.revents & libc::POLLNVAL != 0 {
        return Err(io::Error::from_raw_os_error(libc::EBADF));
    }
    Ok(pollfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0)
}

#[cfg(unix)]
fn read_fd(fd: libc::c_int, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: `buf` is valid for `buf.len()` bytes of writes.
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(n as usize)
}
