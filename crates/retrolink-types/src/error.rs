//! Error types for retrolink.

use std::io;

/// Errors produced by the command layer.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Failures reported by a frontend when accessing core memory.
///
/// The `Display` text is sent verbatim after `-1` in memory command replies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("no memory map defined")]
    NoMemoryMap,

    #[error("no descriptor for address")]
    Unmapped,

    #[error("descriptor is read-only")]
    ReadOnly,

    #[error("disallowed in hardcore mode")]
    Hardcore,

    #[error("no content loaded")]
    NoContent,
}
