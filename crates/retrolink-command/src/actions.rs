//! Action registry: named queries and effects with optional replies.
//!
//! Every handler validates its own arguments. A handler returns `false` when
//! the arguments are malformed or the action was declined; nothing is sent
//! back in that case. Replies are queued on the [`ActionContext`] and relayed
//! by the command handler with a trailing newline.

use retrolink_types::error::MemoryError;
use retrolink_types::event::EventCommand;

use crate::frontend::Frontend;

/// Largest read a memory command will answer.
pub const MAX_MEMORY_READ: usize = 4096;

/// Per-invocation state handed to an action handler.
pub struct ActionContext<'a> {
    /// The running application.
    pub frontend: &'a mut dyn Frontend,
    reply: Option<String>,
}

impl<'a> ActionContext<'a> {
    pub fn new(frontend: &'a mut dyn Frontend) -> Self {
        Self {
            frontend,
            reply: None,
        }
    }

    /// Queue the reply line (without terminator). A later call replaces it.
    pub fn reply(&mut self, payload: impl Into<String>) {
        self.reply = Some(payload.into());
    }

    pub fn take_reply(&mut self) -> Option<String> {
        self.reply.take()
    }
}

/// Signature of an action handler: context and raw argument remainder in,
/// success out.
pub type ActionFn = fn(&mut ActionContext<'_>, &str) -> bool;

/// A named action.
#[derive(Clone, Copy)]
pub struct ActionEntry {
    pub token: &'static str,
    pub handler: ActionFn,
    /// Argument shape, for help output.
    pub arg_desc: &'static str,
}

impl std::fmt::Debug for ActionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEntry")
            .field("token", &self.token)
            .field("arg_desc", &self.arg_desc)
            .finish()
    }
}

/// Every action command. Consulted only when the bind table misses.
pub static ACTION_TABLE: &[ActionEntry] = &[
    ActionEntry {
        token: "VERSION",
        handler: version,
        arg_desc: "No argument",
    },
    ActionEntry {
        token: "GET_STATUS",
        handler: get_status,
        arg_desc: "No argument",
    },
    ActionEntry {
        token: "GET_CONFIG_PARAM",
        handler: get_config_param,
        arg_desc: "<param name>",
    },
    ActionEntry {
        token: "SHOW_MSG",
        handler: show_msg,
        arg_desc: "<message>",
    },
    ActionEntry {
        token: "SET_SHADER",
        handler: set_shader,
        arg_desc: "<shader path>",
    },
    ActionEntry {
        token: "READ_CORE_RAM",
        handler: read_core_ram,
        arg_desc: "<address> <number of bytes>",
    },
    ActionEntry {
        token: "WRITE_CORE_RAM",
        handler: write_core_ram,
        arg_desc: "<address> <byte1> <byte2> ...",
    },
    ActionEntry {
        token: "READ_CORE_MEMORY",
        handler: read_core_memory,
        arg_desc: "<address> <number of bytes>",
    },
    ActionEntry {
        token: "WRITE_CORE_MEMORY",
        handler: write_core_memory,
        arg_desc: "<address> <byte1> <byte2> ...",
    },
];

/// Exact, case-sensitive lookup.
pub fn lookup_action(token: &str) -> Option<&'static ActionEntry> {
    ACTION_TABLE.iter().find(|entry| entry.token == token)
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Hex address with an optional `0x` prefix.
fn parse_address(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex_digits(digits).and_then(|d| u32::from_str_radix(d, 16).ok())
}

/// `text` if it is nothing but hex digits. `from_str_radix` alone takes a sign.
fn hex_digits(text: &str) -> Option<&str> {
    (!text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())).then_some(text)
}

/// `<hex address> <decimal count>`, count in `1..`.
fn parse_read_args(args: &str) -> Option<(u32, usize)> {
    let mut parts = args.split_whitespace();
    let address = parse_address(parts.next()?)?;
    let count: usize = parts.next()?.parse().ok()?;
    (count > 0).then_some((address, count.min(MAX_MEMORY_READ)))
}

/// `<hex address> <hex byte>...`, at least one byte.
fn parse_write_args(args: &str) -> Option<(u32, Vec<u8>)> {
    let mut parts = args.split_whitespace();
    let address = parse_address(parts.next()?)?;
    let bytes = parts
        .map(|b| hex_digits(b).and_then(|d| u8::from_str_radix(d, 16).ok()))
        .collect::<Option<Vec<u8>>>()?;
    (!bytes.is_empty()).then_some((address, bytes))
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn version(ctx: &mut ActionContext<'_>, _args: &str) -> bool {
    let version = ctx.frontend.version();
    ctx.reply(version);
    true
}

fn get_status(ctx: &mut ActionContext<'_>, _args: &str) -> bool {
    let status = ctx.frontend.content_status();
    ctx.reply(format!("GET_STATUS {status}"));
    true
}

fn get_config_param(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    let Some(name) = args.split_whitespace().next() else {
        return false;
    };
    let value = ctx
        .frontend
        .config_param(name)
        .unwrap_or_else(|| "unsupported".to_string());
    ctx.reply(format!("GET_CONFIG_PARAM {name} {value}"));
    true
}

fn show_msg(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    if args.is_empty() {
        return false;
    }
    ctx.frontend.show_message(args);
    true
}

fn set_shader(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    if args.is_empty() {
        return false;
    }
    ctx.frontend
        .perform(EventCommand::ShaderPresetLoad, Some(args))
}

fn read_core_ram(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    let Some((address, count)) = parse_read_args(args) else {
        return false;
    };
    match ctx.frontend.read_achievement_ram(address, count) {
        Ok(bytes) if !bytes.is_empty() => {
            ctx.reply(format!("READ_CORE_RAM {address:x} {}", hex_bytes(&bytes)))
        },
        Ok(_) | Err(_) => ctx.reply(format!("READ_CORE_RAM {address:x} -1")),
    }
    true
}

fn write_core_ram(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    let Some((address, bytes)) = parse_write_args(args) else {
        return false;
    };
    if ctx.frontend.hardcore_mode() {
        log::debug!("WRITE_CORE_RAM refused in hardcore mode");
        return false;
    }
    match ctx.frontend.write_achievement_ram(address, &bytes) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("WRITE_CORE_RAM {address:x}: {e}");
            false
        },
    }
}

fn read_core_memory(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    let Some((address, count)) = parse_read_args(args) else {
        return false;
    };
    match ctx.frontend.read_memory(address, count) {
        Ok(bytes) if !bytes.is_empty() => {
            ctx.reply(format!("READ_CORE_MEMORY {address:x} {}", hex_bytes(&bytes)))
        },
        Ok(_) => ctx.reply(format!(
            "READ_CORE_MEMORY {address:x} -1 {}",
            MemoryError::Unmapped
        )),
        Err(e) => ctx.reply(format!("READ_CORE_MEMORY {address:x} -1 {e}")),
    }
    true
}

fn write_core_memory(ctx: &mut ActionContext<'_>, args: &str) -> bool {
    let Some((address, bytes)) = parse_write_args(args) else {
        return false;
    };
    let result = if ctx.frontend.hardcore_mode() {
        Err(MemoryError::Hardcore)
    } else {
        ctx.frontend.write_memory(address, &bytes)
    };
    match result {
        Ok(written) => ctx.reply(format!("WRITE_CORE_MEMORY {address:x} {written}")),
        Err(e) => ctx.reply(format!("WRITE_CORE_MEMORY {address:x} -1 {e}")),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestFrontend;

    fn run(frontend: &mut TestFrontend, token: &str, args: &str) -> (bool, Option<String>) {
        let entry = lookup_action(token).unwrap();
        let mut ctx = ActionContext::new(frontend);
        let ok = (entry.handler)(&mut ctx, args);
        (ok, ctx.take_reply())
    }

    #[test]
    fn table_has_unique_tokens() {
        let mut tokens: Vec<_> = ACTION_TABLE.iter().map(|e| e.token).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), ACTION_TABLE.len());
        assert_eq!(ACTION_TABLE.len(), 9);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup_action("VERSION").is_some());
        assert!(lookup_action("version").is_none());
        assert!(lookup_action("VERS").is_none());
    }

    #[test]
    fn parse_address_accepts_prefix() {
        assert_eq!(parse_address("7e0010"), Some(0x7e0010));
        assert_eq!(parse_address("0x10"), Some(0x10));
        assert_eq!(parse_address("0XfF"), Some(0xff));
        assert_eq!(parse_address("zz"), None);
        assert_eq!(parse_address(""), None);
        assert_eq!(parse_address("100000000"), None);
        assert_eq!(parse_address("+10"), None);
        assert_eq!(parse_address("0x+10"), None);
        assert_eq!(parse_address("0x"), None);
    }

    #[test]
    fn parse_read_args_caps_count() {
        assert_eq!(parse_read_args("10 4"), Some((0x10, 4)));
        assert_eq!(parse_read_args("10 999999"), Some((0x10, MAX_MEMORY_READ)));
        assert_eq!(parse_read_args("10 0"), None);
        assert_eq!(parse_read_args("10"), None);
        assert_eq!(parse_read_args("10 ten"), None);
    }

    #[test]
    fn parse_write_args_requires_bytes() {
        assert_eq!(parse_write_args("10 ab 0C"), Some((0x10, vec![0xab, 0x0c])));
        assert_eq!(parse_write_args("10"), None);
        assert_eq!(parse_write_args("10 100"), None);
        assert_eq!(parse_write_args("+10 ff"), None);
        assert_eq!(parse_write_args("10 +ff"), None);
    }

    #[test]
    fn version_replies_with_frontend_version() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "VERSION", ""), (true, Some("9.9.9".to_string())));
    }

    #[test]
    fn get_status_contentless() {
        let mut fe = TestFrontend::new();
        assert_eq!(
            run(&mut fe, "GET_STATUS", ""),
            (true, Some("GET_STATUS CONTENTLESS".to_string()))
        );
    }

    #[test]
    fn get_config_param_known_and_missing() {
        let mut fe = TestFrontend::new();
        assert_eq!(
            run(&mut fe, "GET_CONFIG_PARAM", "video_fullscreen"),
            (true, Some("GET_CONFIG_PARAM video_fullscreen false".to_string()))
        );
        assert_eq!(
            run(&mut fe, "GET_CONFIG_PARAM", "missing_key"),
            (true, Some("GET_CONFIG_PARAM missing_key unsupported".to_string()))
        );
    }

    #[test]
    fn get_config_param_without_name_fails() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "GET_CONFIG_PARAM", ""), (false, None));
    }

    #[test]
    fn show_msg_forwards_text() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "SHOW_MSG", "hello there"), (true, None));
        assert_eq!(fe.messages, vec!["hello there"]);
        assert_eq!(run(&mut fe, "SHOW_MSG", ""), (false, None));
    }

    #[test]
    fn set_shader_goes_through_event_bridge() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "SET_SHADER", "crt/zfast.slangp"), (true, None));
        assert_eq!(
            fe.events,
            vec![(EventCommand::ShaderPresetLoad, Some("crt/zfast.slangp".to_string()))]
        );
        assert_eq!(run(&mut fe, "SET_SHADER", ""), (false, None));
    }

    #[test]
    fn read_core_memory_hex_reply() {
        let mut fe = TestFrontend::new();
        assert_eq!(
            run(&mut fe, "READ_CORE_MEMORY", "1000 3"),
            (true, Some("READ_CORE_MEMORY 1000 00 01 02".to_string()))
        );
    }

    #[test]
    fn read_core_memory_unmapped_reports_reason() {
        let mut fe = TestFrontend::new();
        assert_eq!(
            run(&mut fe, "READ_CORE_MEMORY", "ffff 1"),
            (
                true,
                Some("READ_CORE_MEMORY ffff -1 no descriptor for address".to_string())
            )
        );
    }

    #[test]
    fn read_core_memory_malformed_is_silent() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "READ_CORE_MEMORY", "nothex 1"), (false, None));
        assert_eq!(run(&mut fe, "READ_CORE_MEMORY", "1000"), (false, None));
    }

    #[test]
    fn write_core_memory_reports_count() {
        let mut fe = TestFrontend::new();
        assert_eq!(
            run(&mut fe, "WRITE_CORE_MEMORY", "1001 aa bb"),
            (true, Some("WRITE_CORE_MEMORY 1001 2".to_string()))
        );
        assert_eq!(
            run(&mut fe, "READ_CORE_MEMORY", "1000 3"),
            (true, Some("READ_CORE_MEMORY 1000 00 AA BB".to_string()))
        );
    }

    #[test]
    fn write_core_memory_refused_in_hardcore() {
        let mut fe = TestFrontend::new();
        fe.hardcore = true;
        assert_eq!(
            run(&mut fe, "WRITE_CORE_MEMORY", "1000 01"),
            (
                true,
                Some("WRITE_CORE_MEMORY 1000 -1 disallowed in hardcore mode".to_string())
            )
        );
    }

    #[test]
    fn write_core_memory_malformed_byte_is_silent() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "WRITE_CORE_MEMORY", "1000 xyz"), (false, None));
        assert_eq!(run(&mut fe, "WRITE_CORE_MEMORY", "1000"), (false, None));
    }

    #[test]
    fn signed_hex_is_malformed() {
        let mut fe = TestFrontend::new();
        assert_eq!(run(&mut fe, "WRITE_CORE_MEMORY", "+1000 +ff"), (false, None));
        assert_eq!(run(&mut fe, "READ_CORE_MEMORY", "+1000 2"), (false, None));
        assert_eq!(fe.read_memory(0x1000, 1), Ok(vec![0]));
    }

    #[test]
    fn core_ram_without_achievements_reports_minus_one() {
        let mut fe = TestFrontend::new();
        assert_eq!(
            run(&mut fe, "READ_CORE_RAM", "10 2"),
            (true, Some("READ_CORE_RAM 10 -1".to_string()))
        );
        assert_eq!(run(&mut fe, "WRITE_CORE_RAM", "10 01"), (false, None));
    }
}
