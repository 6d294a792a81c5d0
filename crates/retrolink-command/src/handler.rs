//! The per-transport command handler and its once-per-frame entry point.

use std::net::IpAddr;
use std::ops::AddAssign;
use std::path::Path;

use retrolink_net::{CommandTransport, Driver, NetworkTransport, StdinTransport, TransportKind};
use retrolink_types::error::Result;
use retrolink_types::input::{ButtonState, VirtualButton};

use crate::dispatch::{Dispatch, dispatch};
use crate::frontend::Frontend;
use crate::parser::parse;

/// Counters for one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Complete lines drained from the transport, blank ones included.
    pub lines: usize,
    pub binds: usize,
    /// Action hits, whether or not the handler succeeded.
    pub actions: usize,
    /// Replies the transport accepted.
    pub replies: usize,
    pub unrecognized: usize,
}

impl AddAssign for PollSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.lines += rhs.lines;
        self.binds += rhs.binds;
        self.actions += rhs.actions;
        self.replies += rhs.replies;
        self.unrecognized += rhs.unrecognized;
    }
}

/// One transport plus the virtual buttons its commands asserted this frame.
pub struct CommandHandler<T: CommandTransport = Driver> {
    transport: T,
    state: ButtonState,
}

impl CommandHandler<Driver> {
    /// Listen for datagrams on `addr:port`.
    pub fn network(addr: IpAddr, port: u16) -> Result<Self> {
        let transport = NetworkTransport::bind(addr, port)?;
        log::info!("Command interface listening on {addr}:{port}/udp");
        Ok(Self::new(transport.into()))
    }

    /// Read commands from standard input, replying on standard output.
    pub fn stdin() -> Result<Self> {
        let transport = StdinTransport::new()?;
        log::info!("Command interface reading standard input");
        Ok(Self::new(transport.into()))
    }

    /// Accept stream connections on a local socket.
    #[cfg(unix)]
    pub fn local_socket(path: &Path, max_clients: usize) -> Result<Self> {
        let transport = retrolink_net::LocalSocketTransport::bind(path, max_clients)?;
        log::info!("Command interface listening on {}", path.display());
        Ok(Self::new(transport.into()))
    }

    #[cfg(not(unix))]
    pub fn local_socket(path: &Path, _max_clients: usize) -> Result<Self> {
        Err(retrolink_types::error::LinkError::Unsupported(format!(
            "local socket {} requires a unix platform",
            path.display()
        )))
    }
}

impl<T: CommandTransport> CommandHandler<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ButtonState::new(),
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Buttons asserted during the most recent poll.
    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.state.is_pressed(button)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drain and dispatch every pending line. Call once per frame.
    ///
    /// The button state is cleared first, so after this returns it holds
    /// exactly the binds received in this cycle. A transport error aborts the
    /// cycle before any line is dispatched; the handler stays usable.
    pub fn poll_and_dispatch(&mut self, frontend: &mut dyn Frontend) -> Result<PollSummary> {
        self.state.clear();
        let lines = self.transport.poll()?;

        let mut summary = PollSummary {
            lines: lines.len(),
            ..PollSummary::default()
        };

        for line in &lines {
            let Some(cmd) = parse(&line.text) else {
                continue;
            };
            match dispatch(&cmd, &mut self.state, frontend) {
                Dispatch::Bind(button) => {
                    log::debug!("{}: {} from {}", self.transport.kind(), button, line.from);
                    summary.binds += 1;
                },
                Dispatch::Action { token, handled, reply } => {
                    summary.actions += 1;
                    if !handled {
                        log::debug!("{token} from {} failed: {:?}", line.from, cmd.args);
                    }
                    if let Some(reply) = reply {
                        let payload = format!("{reply}\n");
                        match self.transport.reply(&line.from, payload.as_bytes()) {
                            Ok(()) => summary.replies += 1,
                            Err(e) => log::debug!("Reply to {} dropped: {e}", line.from),
                        }
                    }
                },
                Dispatch::Unrecognized => {
                    log::debug!("Unrecognized command from {}: {}", line.from, cmd.token);
                    summary.unrecognized += 1;
                },
            }
        }

        Ok(summary)
    }
}
