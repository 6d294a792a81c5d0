//! Application configuration file.
//!
//! ```toml
//! [command]
//! network_enable = true
//!
//! [frontend]
//! frame_rate = 60
//! system_id = "super_nes"
//! content = "Chrono Trigger"
//! crc32 = 0x2d206bf7
//!
//! [params]
//! video_fullscreen = false
//! savestate_auto_index = 3
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use retrolink_types::config::CommandConfig;
use retrolink_types::error::{LinkError, Result};

/// Everything the demo binary reads from its config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub command: CommandConfig,
    pub frontend: FrontendConfig,
    /// Values answered by `GET_CONFIG_PARAM`.
    pub params: BTreeMap<String, toml::Value>,
}

/// The simulated frontend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Frames per second of the main loop.
    pub frame_rate: u32,
    /// Reported by `VERSION`.
    pub version: String,
    pub system_id: String,
    /// Name of the loaded content. No content when absent.
    pub content: Option<String>,
    pub crc32: u32,
    /// Size of the work RAM region at address 0.
    pub ram_size: usize,
    pub hardcore: bool,
    pub start_paused: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            version: env!("CARGO_PKG_VERSION").to_string(),
            system_id: "demo".to_string(),
            content: None,
            crc32: 0,
            ram_size: 0x800,
            hardcore: false,
            start_paused: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::info!("Loading config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.command.validate()?;
        if !(1..=1000).contains(&self.frontend.frame_rate) {
            return Err(LinkError::Config(format!(
                "frame_rate {} out of range 1..=1000",
                self.frontend.frame_rate
            )));
        }
        Ok(())
    }

    /// Parameters flattened to their reply text. Strings are unquoted.
    pub fn param_strings(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.frontend.frame_rate, 60);
        assert_eq!(config.frontend.version, env!("CARGO_PKG_VERSION"));
        assert!(config.frontend.content.is_none());
        assert!(!config.command.any_enabled());
        assert!(config.params.is_empty());
    }

    #[test]
    fn full_file() {
        let config = AppConfig::from_toml_str(
            r#"
            [command]
            network_enable = true
            network_port = 4000

            [frontend]
            frame_rate = 30
            system_id = "super_nes"
            content = "Chrono Trigger"
            crc32 = 0x2d206bf7
            hardcore = true

            [params]
            video_fullscreen = false
            savestate_auto_index = 3
            menu_driver = "xmb"
            "#,
        )
        .unwrap();

        assert!(config.command.network_enable);
        assert_eq!(config.command.network_port, 4000);
        assert_eq!(config.frontend.frame_rate, 30);
        assert_eq!(config.frontend.content.as_deref(), Some("Chrono Trigger"));
        assert_eq!(config.frontend.crc32, 0x2d206bf7);
        assert!(config.frontend.hardcore);

        let params = config.param_strings();
        assert_eq!(params["video_fullscreen"], "false");
        assert_eq!(params["savestate_auto_index"], "3");
        assert_eq!(params["menu_driver"], "xmb");
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let err = AppConfig::from_toml_str("[frontend]\nframe_rate = 0\n").unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }

    #[test]
    fn invalid_command_table_is_rejected() {
        let err = AppConfig::from_toml_str("[command]\nmax_local_clients = 0\n").unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[frontend]\ncontent = \"Tiny\"").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.frontend.content.as_deref(), Some("Tiny"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/nonexistent/retrolink.toml")).unwrap_err();
        assert!(matches!(err, LinkError::Io(_)));
    }
}
