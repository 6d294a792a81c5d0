//! Remote command core.
//!
//! A [`CommandHandler`] owns one transport and a per-frame [`ButtonState`].
//! Once per frame the embedding loop calls
//! [`CommandHandler::poll_and_dispatch`], which drains every pending line,
//! parses it, and resolves the token against the bind table first and the
//! action registry second. Binds assert a virtual button for this frame only;
//! actions run against the [`Frontend`] and may reply to the sender.
//!
//! [`ButtonState`]: retrolink_types::input::ButtonState

pub mod actions;
pub mod binds;
mod dispatch;
mod frontend;
mod handler;
pub mod memory;
mod parser;
mod send;
mod slots;

pub use actions::{ACTION_TABLE, ActionContext, ActionEntry, ActionFn, lookup_action};
pub use binds::{BIND_TABLE, BindEntry, lookup_bind};
pub use dispatch::{Dispatch, dispatch};
pub use frontend::{ContentStatus, Frontend};
pub use handler::{CommandHandler, PollSummary};
pub use parser::{ParsedCommand, parse};
pub use send::{CommandTarget, command_catalog, is_known_command, send_network_command, verify_tables};
pub use slots::{CommandSlots, MAX_CMD_DRIVERS};

#[cfg(test)]
mod test_utils;
