//! Fixed set of command handler slots, one per transport kind.

use retrolink_net::{CommandTransport, Driver, TransportKind};
use retrolink_types::config::CommandConfig;
use retrolink_types::error::LinkError;
use retrolink_types::input::{ButtonState, VirtualButton};

use crate::frontend::Frontend;
use crate::handler::{CommandHandler, PollSummary};

/// Number of transport slots.
pub const MAX_CMD_DRIVERS: usize = 3;

/// Up to one active handler per transport kind, polled network first, then
/// standard input, then the local socket.
pub struct CommandSlots<T: CommandTransport = Driver> {
    slots: [Option<CommandHandler<T>>; MAX_CMD_DRIVERS],
}

impl CommandSlots<Driver> {
    /// Open every transport the config enables.
    ///
    /// A transport that fails to open is reported and its slot left empty;
    /// the others still open.
    pub fn open_from_config(config: &CommandConfig) -> (Self, Vec<(TransportKind, LinkError)>) {
        let mut slots = Self::new();
        let mut failures = Vec::new();

        let mut open = |kind: TransportKind, result: Result<CommandHandler, LinkError>| match result {
            Ok(handler) => {
                slots.enable(handler);
            },
            Err(e) => {
                log::warn!("Failed to open {kind} command interface: {e}");
                failures.push((kind, e));
            },
        };

        if config.network_enable {
            open(
                TransportKind::Network,
                CommandHandler::network(config.network_bind, config.network_port),
            );
        }
        if config.stdin_enable {
            open(TransportKind::Stdin, CommandHandler::stdin());
        }
        if config.local_socket_enable {
            open(
                TransportKind::LocalSocket,
                CommandHandler::local_socket(&config.local_socket_path, config.max_local_clients),
            );
        }

        (slots, failures)
    }
}

impl<T: CommandTransport> CommandSlots<T> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Install a handler in its kind's slot, returning whatever it replaced.
    pub fn enable(&mut self, handler: CommandHandler<T>) -> Option<CommandHandler<T>> {
        let slot = handler.kind().slot();
        self.slots[slot].replace(handler)
    }

    /// Remove and return the handler for `kind`. Dropping it closes the
    /// transport.
    pub fn disable(&mut self, kind: TransportKind) -> Option<CommandHandler<T>> {
        self.slots[kind.slot()].take()
    }

    pub fn get(&self, kind: TransportKind) -> Option<&CommandHandler<T>> {
        self.slots[kind.slot()].as_ref()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Poll every active slot in order. A failing transport is logged and
    /// skipped for this frame.
    pub fn poll_all(&mut self, frontend: &mut dyn Frontend) -> PollSummary {
        let mut total = PollSummary::default();
        for handler in self.slots.iter_mut().flatten() {
            match handler.poll_and_dispatch(frontend) {
                Ok(summary) => total += summary,
                Err(e) => log::warn!("{} command poll failed: {e}", handler.kind()),
            }
        }
        total
    }

    /// Whether any slot asserted `button` in the last poll.
    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.slots.iter().flatten().any(|h| h.is_pressed(button))
    }

    /// Union of every slot's button state.
    pub fn pressed(&self) -> ButtonState {
        let mut state = ButtonState::new();
        for handler in self.slots.iter().flatten() {
            state.merge(handler.state());
        }
        state
    }
}

impl<T: CommandTransport> Default for CommandSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}
