//! Resolve a parsed command against the bind table, then the action registry.

use retrolink_types::input::{ButtonState, VirtualButton};

use crate::actions::{ActionContext, lookup_action};
use crate::binds::lookup_bind;
use crate::frontend::Frontend;
use crate::parser::ParsedCommand;

/// What a single command line resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A bind command; the button is now asserted for this frame.
    Bind(VirtualButton),
    /// An action ran. `reply` is the payload to send back, if any.
    Action {
        token: &'static str,
        handled: bool,
        reply: Option<String>,
    },
    /// Neither table knows the token.
    Unrecognized,
}

/// Dispatch one command. Binds win over actions with the same token.
pub fn dispatch(cmd: &ParsedCommand<'_>, state: &mut ButtonState, frontend: &mut dyn Frontend) -> Dispatch {
    if let Some(button) = lookup_bind(cmd.token) {
        state.press(button);
        return Dispatch::Bind(button);
    }

    let Some(entry) = lookup_action(cmd.token) else {
        return Dispatch::Unrecognized;
    };

    let mut ctx = ActionContext::new(frontend);
    let handled = (entry.handler)(&mut ctx, cmd.args);
    // A declined action never answers.
    let reply = if handled { ctx.take_reply() } else { None };
    Dispatch::Action {
        token: entry.token,
        handled,
        reply,
    }
}
