//! The embedding application, as seen by action handlers.

use std::fmt;

use retrolink_types::error::MemoryError;
use retrolink_types::event::EventCommand;

/// What the frontend is currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentStatus {
    /// No content loaded.
    Contentless,
    /// Content loaded, running or paused.
    Running {
        paused: bool,
        /// Short system identifier, e.g. `super_nes`.
        system_id: String,
        content_name: String,
        crc32: u32,
    },
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contentless => write!(f, "CONTENTLESS"),
            Self::Running {
                paused,
                system_id,
                content_name,
                crc32,
            } => write!(
                f,
                "{} {system_id},{content_name},crc32={crc32:08x}",
                if *paused { "PAUSED" } else { "PLAYING" }
            ),
        }
    }
}

/// Services the action handlers need from the running application.
///
/// Memory access defaults to "no memory map" so a frontend without a core
/// only has to implement the queries.
pub trait Frontend {
    /// Version string reported by `VERSION`.
    fn version(&self) -> String;

    fn content_status(&self) -> ContentStatus;

    /// Value of a named configuration parameter, `None` if unknown.
    fn config_param(&self, name: &str) -> Option<String>;

    /// Show a transient on-screen message.
    fn show_message(&mut self, text: &str);

    /// The application's single "perform event" entry point.
    fn perform(&mut self, event: EventCommand, payload: Option<&str>) -> bool;

    /// Whether achievement hardcore mode forbids memory writes.
    fn hardcore_mode(&self) -> bool {
        false
    }

    /// Read up to `len` bytes of core memory at a system address.
    ///
    /// May return fewer bytes when the mapped region ends first.
    fn read_memory(&self, _address: u32, _len: usize) -> Result<Vec<u8>, MemoryError> {
        Err(MemoryError::NoMemoryMap)
    }

    /// Write bytes to core memory at a system address, returning how many
    /// were written.
    fn write_memory(&mut self, _address: u32, _bytes: &[u8]) -> Result<usize, MemoryError> {
        Err(MemoryError::NoMemoryMap)
    }

    /// Read from the achievement address space.
    fn read_achievement_ram(&self, _address: u32, _len: usize) -> Result<Vec<u8>, MemoryError> {
        Err(MemoryError::NoMemoryMap)
    }

    /// Write to the achievement address space.
    fn write_achievement_ram(&mut self, _address: u32, _bytes: &[u8]) -> Result<usize, MemoryError> {
        Err(MemoryError::NoMemoryMap)
    }
}
