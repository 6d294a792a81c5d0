//! Command transport configuration.
//!
//! Loaded from the `[command]` table of the application's TOML file. Every
//! field has a default, so an empty table (or no table) yields a config with
//! every transport disabled.
//!
//! ```toml
//! [command]
//! network_enable = true
//! network_port = 55355
//! stdin_enable = false
//! local_socket_enable = true
//! local_socket_path = "/tmp/retrolink-cmd.sock"
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LinkError, Result};

/// Default UDP port of the network command transport.
pub const DEFAULT_NETWORK_CMD_PORT: u16 = 55355;

/// Default number of simultaneous local socket clients.
pub const DEFAULT_MAX_LOCAL_CLIENTS: usize = 4;

/// Which command transports to open and how.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Open the UDP network transport.
    pub network_enable: bool,
    /// Address the network transport binds to.
    pub network_bind: IpAddr,
    /// Port the network transport binds to.
    pub network_port: u16,
    /// Read commands from standard input.
    pub stdin_enable: bool,
    /// Open the local domain socket transport.
    pub local_socket_enable: bool,
    /// Socket path. On Linux a leading `@` selects the abstract namespace.
    pub local_socket_path: PathBuf,
    /// Maximum simultaneous local socket clients.
    pub max_local_clients: usize,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            network_enable: false,
            network_bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            network_port: DEFAULT_NETWORK_CMD_PORT,
            stdin_enable: false,
            local_socket_enable: false,
            local_socket_path: default_local_socket_path(),
            max_local_clients: DEFAULT_MAX_LOCAL_CLIENTS,
        }
    }
}

fn default_local_socket_path() -> PathBuf {
    std::env::temp_dir().join("retrolink-cmd.sock")
}

impl CommandConfig {
    /// Parse a config from TOML text containing the fields at top level.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("loading command config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Whether any transport is enabled.
    pub fn any_enabled(&self) -> bool {
        self.network_enable || self.stdin_enable || self.local_socket_enable
    }

    /// Reject values no transport can work with.
    pub fn validate(&self) -> Result<()> {
        if self.network_enable && self.network_port == 0 {
            return Err(LinkError::Config(
                "network_port must be non-zero when network_enable is set".to_string(),
            ));
        }
        if self.local_socket_enable && self.local_socket_path.as_os_str().is_empty() {
            return Err(LinkError::Config(
                "local_socket_path must not be empty".to_string(),
            ));
        }
        if self.max_local_clients == 0 {
            return Err(LinkError::Config(
                "max_local_clients must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = CommandConfig::default();
        assert!(!config.network_enable);
        assert_eq!(config.network_port, 55355);
        assert_eq!(config.network_bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(!config.stdin_enable);
        assert!(!config.local_socket_enable);
        assert_eq!(config.max_local_clients, 4);
        assert!(!config.any_enabled());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = CommandConfig::from_toml_str("").unwrap();
        assert_eq!(config, CommandConfig::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CommandConfig::from_toml_str(
            r#"
network_enable = true
network_port = 55400
network_bind = "127.0.0.1"
"#,
        )
        .unwrap();
        assert!(config.network_enable);
        assert_eq!(config.network_port, 55400);
        assert_eq!(config.network_bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(!config.stdin_enable);
        assert!(config.any_enabled());
    }

    #[test]
    fn zero_port_rejected_when_enabled() {
        let err = CommandConfig::from_toml_str("network_enable = true\nnetwork_port = 0").unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }

    #[test]
    fn zero_port_allowed_when_disabled() {
        assert!(CommandConfig::from_toml_str("network_port = 0").is_ok());
    }

    #[test]
    fn zero_clients_rejected() {
        let err = CommandConfig::from_toml_str("max_local_clients = 0").unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }

    #[test]
    fn bad_type_is_parse_error() {
        let err = CommandConfig::from_toml_str("network_port = \"high\"").unwrap_err();
        assert!(matches!(err, LinkError::TomlParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stdin_enable = true").unwrap();
        writeln!(file, "local_socket_enable = true").unwrap();
        writeln!(file, "local_socket_path = \"/tmp/rl-test.sock\"").unwrap();
        let config = CommandConfig::load(file.path()).unwrap();
        assert!(config.stdin_enable);
        assert!(config.local_socket_enable);
        assert_eq!(config.local_socket_path, PathBuf::from("/tmp/rl-test.sock"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = CommandConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, LinkError::Io(_)));
    }
}
