//! A simulated frontend: a frame counter ticking in work RAM, a parameter
//! table and on-screen messages routed to the log.

use std::collections::BTreeMap;

use retrolink_command::memory::{MemoryMap, MemoryRegion};
use retrolink_command::{ContentStatus, Frontend};
use retrolink_types::error::MemoryError;
use retrolink_types::event::EventCommand;

use crate::config::AppConfig;

/// Start of the read-only content header region.
pub const HEADER_BASE: u32 = 0x8000;
const HEADER_LEN: usize = 32;
const MAX_MESSAGES: usize = 8;

struct LoadedContent {
    name: String,
    crc32: u32,
}

pub struct DemoFrontend {
    version: String,
    system_id: String,
    content: Option<LoadedContent>,
    paused: bool,
    hardcore: bool,
    params: BTreeMap<String, String>,
    memory: MemoryMap,
    frame: u32,
    messages: Vec<String>,
    quit_requested: bool,
}

fn build_memory(ram_size: usize, content_name: &str) -> MemoryMap {
    let mut header = content_name.as_bytes().to_vec();
    header.resize(HEADER_LEN, 0);
    MemoryMap::new()
        .with_region(MemoryRegion::new(0, vec![0; ram_size], true))
        .with_region(MemoryRegion::new(HEADER_BASE, header, false))
}

impl DemoFrontend {
    pub fn from_config(config: &AppConfig) -> Self {
        let fe = &config.frontend;
        let mut params = config.param_strings();
        for (key, value) in [
            ("video_fullscreen", "false"),
            ("audio_mute_enable", "false"),
            ("video_shader", ""),
        ] {
            params.entry(key.to_string()).or_insert_with(|| value.to_string());
        }

        let content = fe.content.as_ref().map(|name| LoadedContent {
            name: name.clone(),
            crc32: fe.crc32,
        });
        let memory = match &content {
            Some(c) => build_memory(fe.ram_size, &c.name),
            None => MemoryMap::new(),
        };

        Self {
            version: fe.version.clone(),
            system_id: fe.system_id.clone(),
            content,
            paused: fe.start_paused,
            hardcore: fe.hardcore,
            params,
            memory,
            frame: 0,
            messages: Vec::new(),
            quit_requested: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Most recent on-screen messages, oldest first.
    #[cfg(test)]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Advance one frame unless paused. `force` steps even while paused.
    pub fn run_frame(&mut self, force: bool) {
        if self.content.is_none() || (self.paused && !force) {
            return;
        }
        self.frame = self.frame.wrapping_add(1);
        if let Err(e) = self.memory.write(0, &self.frame.to_le_bytes()) {
            log::debug!("Frame counter not stored: {e}");
        }
    }

    fn toggle_param(&mut self, key: &str) {
        let on = self.params.get(key).is_some_and(|v| v == "true");
        self.params.insert(key.to_string(), (!on).to_string());
        log::info!("{key} = {}", !on);
    }

    fn require_content(&self, event: EventCommand) -> bool {
        if self.content.is_none() {
            log::debug!("{event} ignored: no content loaded");
            return false;
        }
        true
    }
}

impl Frontend for DemoFrontend {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn content_status(&self) -> ContentStatus {
        match &self.content {
            None => ContentStatus::Contentless,
            Some(c) => ContentStatus::Running {
                paused: self.paused,
                system_id: self.system_id.clone(),
                content_name: c.name.clone(),
                crc32: c.crc32,
            },
        }
    }

    fn config_param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }

    fn show_message(&mut self, text: &str) {
        log::info!("[OSD] {text}");
        if self.messages.len() == MAX_MESSAGES {
            self.messages.remove(0);
        }
        self.messages.push(text.to_string());
    }

    fn perform(&mut self, event: EventCommand, payload: Option<&str>) -> bool {
        match event {
            EventCommand::Quit => {
                self.quit_requested = true;
                true
            },
            EventCommand::CloseContent => {
                if !self.require_content(event) {
                    return false;
                }
                log::info!("Content closed");
                self.content = None;
                self.memory = MemoryMap::new();
                self.paused = false;
                self.frame = 0;
                true
            },
            EventCommand::Reset => {
                if !self.require_content(event) {
                    return false;
                }
                log::info!("Reset");
                self.frame = 0;
                true
            },
            EventCommand::PauseToggle | EventCommand::Pause | EventCommand::Unpause => {
                if !self.require_content(event) {
                    return false;
                }
                self.paused = match event {
                    EventCommand::Pause => true,
                    EventCommand::Unpause => false,
                    _ => !self.paused,
                };
                log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
                true
            },
            EventCommand::ShaderPresetLoad => match payload {
                Some(path) if !path.is_empty() => {
                    log::info!("Shader preset: {path}");
                    self.params.insert("video_shader".to_string(), path.to_string());
                    true
                },
                _ => false,
            },
            EventCommand::FullscreenToggle => {
                self.toggle_param("video_fullscreen");
                true
            },
            EventCommand::AudioMuteToggle => {
                self.toggle_param("audio_mute_enable");
                true
            },
            EventCommand::LoadState
            | EventCommand::SaveState
            | EventCommand::TakeScreenshot
            | EventCommand::RewindToggle
            | EventCommand::CheatToggle
            | EventCommand::DiskEjectToggle
            | EventCommand::DiskNext
            | EventCommand::DiskPrev => {
                if !self.require_content(event) {
                    return false;
                }
                log::info!("{event}");
                true
            },
            _ => {
                log::info!("{event}");
                true
            },
        }
    }

    fn hardcore_mode(&self) -> bool {
        self.hardcore
    }

    fn read_memory(&self, address: u32, len: usize) -> Result<Vec<u8>, MemoryError> {
        if self.content.is_none() {
            return Err(MemoryError::NoContent);
        }
        self.memory.read(address, len)
    }

    fn write_memory(&mut self, address: u32, bytes: &[u8]) -> Result<usize, MemoryError> {
        if self.content.is_none() {
            return Err(MemoryError::NoContent);
        }
        self.memory.write(address, bytes)
    }

    // The demo core exposes the same address space to achievements.
    fn read_achievement_ram(&self, address: u32, len: usize) -> Result<Vec<u8>, MemoryError> {
        self.read_memory(address, len)
    }

    fn write_achievement_ram(&mut self, address: u32, bytes: &[u8]) -> Result<usize, MemoryError> {
        self.write_memory(address, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_content() -> DemoFrontend {
        let mut config = AppConfig::default();
        config.frontend.content = Some("Tiny".to_string());
        config.frontend.system_id = "nes".to_string();
        config.frontend.crc32 = 0xab;
        DemoFrontend::from_config(&config)
    }

    #[test]
    fn contentless_by_default() {
        let fe = DemoFrontend::from_config(&AppConfig::default());
        assert_eq!(fe.content_status(), ContentStatus::Contentless);
        assert_eq!(fe.read_memory(0, 1), Err(MemoryError::NoContent));
    }

    #[test]
    fn status_with_content() {
        let fe = with_content();
        assert_eq!(fe.content_status().to_string(), "PLAYING nes,Tiny,crc32=000000ab");
    }

    #[test]
    fn builtin_params_do_not_override_config() {
        let mut config = AppConfig::default();
        config
            .params
            .insert("video_fullscreen".to_string(), toml::Value::Boolean(true));
        let fe = DemoFrontend::from_config(&config);
        assert_eq!(fe.config_param("video_fullscreen").as_deref(), Some("true"));
        assert_eq!(fe.config_param("audio_mute_enable").as_deref(), Some("false"));
        assert_eq!(fe.config_param("missing_key"), None);
    }

    #[test]
    fn frame_counter_lands_in_ram() {
        let mut fe = with_content();
        fe.run_frame(false);
        fe.run_frame(false);
        assert_eq!(fe.read_memory(0, 4), Ok(vec![2, 0, 0, 0]));
    }

    #[test]
    fn pause_stops_frames_unless_forced() {
        let mut fe = with_content();
        assert!(fe.perform(EventCommand::PauseToggle, None));
        assert!(fe.is_paused());
        fe.run_frame(false);
        assert_eq!(fe.frame(), 0);
        fe.run_frame(true);
        assert_eq!(fe.frame(), 1);
        assert!(fe.content_status().to_string().starts_with("PAUSED"));
    }

    #[test]
    fn header_is_read_only() {
        let mut fe = with_content();
        assert_eq!(fe.read_memory(HEADER_BASE, 4), Ok(b"Tiny".to_vec()));
        assert_eq!(fe.write_memory(HEADER_BASE, &[0]), Err(MemoryError::ReadOnly));
    }

    #[test]
    fn close_content_drops_memory() {
        let mut fe = with_content();
        assert!(fe.perform(EventCommand::CloseContent, None));
        assert_eq!(fe.content_status(), ContentStatus::Contentless);
        assert!(!fe.perform(EventCommand::CloseContent, None));
        assert!(!fe.perform(EventCommand::Reset, None));
    }

    #[test]
    fn shader_preset_updates_param() {
        let mut fe = with_content();
        assert!(fe.perform(EventCommand::ShaderPresetLoad, Some("crt.slangp")));
        assert_eq!(fe.config_param("video_shader").as_deref(), Some("crt.slangp"));
        assert!(!fe.perform(EventCommand::ShaderPresetLoad, None));
    }

    #[test]
    fn fullscreen_toggle_flips_param() {
        let mut fe = with_content();
        fe.perform(EventCommand::FullscreenToggle, None);
        assert_eq!(fe.config_param("video_fullscreen").as_deref(), Some("true"));
        fe.perform(EventCommand::FullscreenToggle, None);
        assert_eq!(fe.config_param("video_fullscreen").as_deref(), Some("false"));
    }

    #[test]
    fn messages_are_bounded() {
        let mut fe = with_content();
        for i in 0..20 {
            fe.show_message(&format!("msg {i}"));
        }
        assert_eq!(fe.messages().len(), MAX_MESSAGES);
        assert_eq!(fe.messages().last().map(String::as_str), Some("msg 19"));
    }

    #[test]
    fn quit_sets_flag() {
        let mut fe = with_content();
        assert!(!fe.quit_requested());
        assert!(fe.perform(EventCommand::Quit, None));
        assert!(fe.quit_requested());
    }
}
