//! Virtual button identifiers and the per-frame button state vector.
//!
//! The input subsystem and the command core agree on this identifier space:
//! the command core asserts buttons in a [`ButtonState`] once per poll cycle
//! and the input subsystem reads it after the poll returns, as if a physical
//! controller had pressed them.

use std::fmt;

/// A control the input subsystem recognizes, assertable without a physical
/// controller.
///
/// The first sixteen identifiers are the joypad buttons, in device id order.
/// The rest are frontend hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum VirtualButton {
    JoypadB = 0,
    JoypadY,
    JoypadSelect,
    JoypadStart,
    JoypadUp,
    JoypadDown,
    JoypadLeft,
    JoypadRight,
    JoypadA,
    JoypadX,
    JoypadL,
    JoypadR,
    JoypadL2,
    JoypadR2,
    JoypadL3,
    JoypadR3,
    FastForward,
    FastForwardHold,
    SlowMotion,
    SlowMotionHold,
    LoadState,
    SaveState,
    FullscreenToggle,
    CloseContent,
    Quit,
    StateSlotPlus,
    StateSlotMinus,
    Rewind,
    BsvRecordToggle,
    PauseToggle,
    FrameAdvance,
    Reset,
    ShaderNext,
    ShaderPrev,
    CheatIndexPlus,
    CheatIndexMinus,
    CheatToggle,
    Screenshot,
    Mute,
    Osk,
    FpsToggle,
    SendDebugInfo,
    NetplayHostToggle,
    NetplayGameWatch,
    VolumeUp,
    VolumeDown,
    OverlayNext,
    DiskEjectToggle,
    DiskNext,
    DiskPrev,
    GrabMouseToggle,
    UiCompanionToggle,
    GameFocusToggle,
    MenuToggle,
    RecordingToggle,
    StreamingToggle,
    RunaheadToggle,
    AiService,
}

impl VirtualButton {
    /// Every identifier, in index order.
    pub const ALL: [VirtualButton; 58] = [
        Self::JoypadB,
        Self::JoypadY,
        Self::JoypadSelect,
        Self::JoypadStart,
        Self::JoypadUp,
        Self::JoypadDown,
        Self::JoypadLeft,
        Self::JoypadRight,
        Self::JoypadA,
        Self::JoypadX,
        Self::JoypadL,
        Self::JoypadR,
        Self::JoypadL2,
        Self::JoypadR2,
        Self::JoypadL3,
        Self::JoypadR3,
        Self::FastForward,
        Self::FastForwardHold,
        Self::SlowMotion,
        Self::SlowMotionHold,
        Self::LoadState,
        Self::SaveState,
        Self::FullscreenToggle,
        Self::CloseContent,
        Self::Quit,
        Self::StateSlotPlus,
        Self::StateSlotMinus,
        Self::Rewind,
        Self::BsvRecordToggle,
        Self::PauseToggle,
        Self::FrameAdvance,
        Self::Reset,
        Self::ShaderNext,
        Self::ShaderPrev,
        Self::CheatIndexPlus,
        Self::CheatIndexMinus,
        Self::CheatToggle,
        Self::Screenshot,
        Self::Mute,
        Self::Osk,
        Self::FpsToggle,
        Self::SendDebugInfo,
        Self::NetplayHostToggle,
        Self::NetplayGameWatch,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::OverlayNext,
        Self::DiskEjectToggle,
        Self::DiskNext,
        Self::DiskPrev,
        Self::GrabMouseToggle,
        Self::UiCompanionToggle,
        Self::GameFocusToggle,
        Self::MenuToggle,
        Self::RecordingToggle,
        Self::StreamingToggle,
        Self::RunaheadToggle,
        Self::AiService,
    ];

    /// Size of the identifier space.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this button in a [`ButtonState`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a button by its index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this is one of the sixteen joypad buttons.
    pub const fn is_joypad(self) -> bool {
        (self as u8) < Self::FastForward as u8
    }
}

impl fmt::Display for VirtualButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Fixed-size pressed/released vector over [`VirtualButton`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pressed: [bool; VirtualButton::COUNT],
}

impl ButtonState {
    /// A state with every button released.
    pub const fn new() -> Self {
        Self {
            pressed: [false; VirtualButton::COUNT],
        }
    }

    /// Assert a button. Pressing an already pressed button is a no-op.
    pub fn press(&mut self, button: VirtualButton) {
        self.pressed[button.index()] = true;
    }

    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.pressed[button.index()]
    }

    /// Release every button.
    pub fn clear(&mut self) {
        self.pressed = [false; VirtualButton::COUNT];
    }

    pub fn is_empty(&self) -> bool {
        !self.pressed.iter().any(|&p| p)
    }

    /// Number of pressed buttons.
    pub fn count(&self) -> usize {
        self.pressed.iter().filter(|&&p| p).count()
    }

    /// Pressed buttons in index order.
    pub fn iter(&self) -> impl Iterator<Item = VirtualButton> + '_ {
        VirtualButton::ALL
            .iter()
            .copied()
            .filter(|b| self.pressed[b.index()])
    }

    /// Set every button that is pressed in `other`.
    pub fn merge(&mut self, other: &ButtonState) {
        for (mine, theirs) in self.pressed.iter_mut().zip(other.pressed.iter()) {
            *mine |= *theirs;
        }
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
