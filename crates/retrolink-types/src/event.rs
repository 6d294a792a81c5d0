//! Frontend event vocabulary.
//!
//! These are the lifecycle and control events the embedding application
//! performs through its single "perform event" entry point. The command core
//! only forwards to that entry point; it never interprets the events itself.

use std::fmt;

/// An application-level event the frontend knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCommand {
    Reset,
    CloseContent,
    LoadState,
    SaveState,
    SaveStateIncrement,
    SaveStateDecrement,
    TakeScreenshot,
    Quit,
    RewindToggle,
    AudioMuteToggle,
    FpsToggle,
    SendDebugInfo,
    NetplayHostToggle,
    NetplayGameWatch,
    OverlayNext,
    PauseToggle,
    Pause,
    Unpause,
    MenuToggle,
    /// Load and apply a shader preset. Payload: preset path.
    ShaderPresetLoad,
    ShaderNext,
    ShaderPrev,
    CheatIndexPlus,
    CheatIndexMinus,
    CheatToggle,
    DiskEjectToggle,
    DiskNext,
    DiskPrev,
    GrabMouseToggle,
    GameFocusToggle,
    UiCompanionToggle,
    FullscreenToggle,
    VolumeUp,
    VolumeDown,
    OskToggle,
    RecordingToggle,
    StreamingToggle,
    RunaheadToggle,
    AiServiceToggle,
    BsvRecordingToggle,
}

impl fmt::Display for EventCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
