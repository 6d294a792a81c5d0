//! Outbound commands and table verification.

use std::collections::HashSet;
use std::time::Duration;

use retrolink_net::{request_reply, send_datagram};
use retrolink_types::config::DEFAULT_NETWORK_CMD_PORT;
use retrolink_types::error::{LinkError, Result};

use crate::actions::{ACTION_TABLE, lookup_action};
use crate::binds::{BIND_TABLE, lookup_bind};
use crate::parser::parse;

const DEFAULT_HOST: &str = "localhost";

/// A command addressed to a remote network transport, from `CMD[;HOST[;PORT]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    /// The full command line, token and arguments.
    pub command: String,
    pub host: String,
    pub port: u16,
}

impl CommandTarget {
    pub fn parse(spec: &str) -> Result<Self> {
        let mut parts = spec.splitn(3, ';');
        let command = parts.next().unwrap_or_default().trim();
        if command.is_empty() {
            return Err(LinkError::Command(format!("no command in {spec:?}")));
        }

        let host = match parts.next().map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => DEFAULT_HOST,
        };

        let port = match parts.next().map(str::trim) {
            Some(p) if !p.is_empty() => p
                .parse::<u16>()
                .ok()
                .filter(|&p| p != 0)
                .ok_or_else(|| LinkError::Config(format!("invalid port {p:?}")))?,
            _ => DEFAULT_NETWORK_CMD_PORT,
        };

        Ok(Self {
            command: command.to_string(),
            host: host.to_string(),
            port,
        })
    }

    /// Refuse commands neither table knows.
    pub fn verify(&self) -> Result<()> {
        if is_known_command(&self.command) {
            Ok(())
        } else {
            Err(LinkError::Command(format!("unknown command: {}", self.command)))
        }
    }

    /// Verify and send without waiting for an answer.
    pub fn send(&self) -> Result<()> {
        self.verify()?;
        send_datagram(&self.host, self.port, &self.command)
    }

    /// Verify, send, and wait up to `timeout` for one reply line.
    pub fn request(&self, timeout: Duration) -> Result<Option<String>> {
        self.verify()?;
        request_reply(&self.host, self.port, &self.command, timeout)
    }
}

/// Whether the token of `line` is a bind or an action.
pub fn is_known_command(line: &str) -> bool {
    parse(line).is_some_and(|cmd| lookup_bind(cmd.token).is_some() || lookup_action(cmd.token).is_some())
}

/// Send a `CMD[;HOST[;PORT]]` command to a running instance.
pub fn send_network_command(spec: &str) -> Result<()> {
    let target = CommandTarget::parse(spec)?;
    target.send()?;
    log::info!("Sent {:?} to {}:{}", target.command, target.host, target.port);
    Ok(())
}

/// Check the static tables for duplicate tokens and bind/action overlap.
pub fn verify_tables() -> Result<()> {
    let mut binds = HashSet::new();
    for entry in BIND_TABLE {
        if !binds.insert(entry.token) {
            return Err(LinkError::Config(format!("duplicate bind command {}", entry.token)));
        }
    }

    let mut actions = HashSet::new();
    for entry in ACTION_TABLE {
        if !actions.insert(entry.token) {
            return Err(LinkError::Config(format!("duplicate action command {}", entry.token)));
        }
        if binds.contains(entry.token) {
            return Err(LinkError::Config(format!(
                "{} is both a bind and an action",
                entry.token
            )));
        }
    }
    Ok(())
}

/// Every command token with its argument description: binds first, then
/// actions, each in table order.
pub fn command_catalog() -> Vec<(&'static str, &'static str)> {
    BIND_TABLE
        .iter()
        .map(|b| (b.token, "No argument"))
        .chain(ACTION_TABLE.iter().map(|a| (a.token, a.arg_desc)))
        .collect()
}
