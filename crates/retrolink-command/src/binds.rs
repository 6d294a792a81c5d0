//! Bind table: command tokens that assert a virtual button for one frame.

use retrolink_types::input::VirtualButton;

/// A bind command and the button it asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindEntry {
    pub token: &'static str,
    pub button: VirtualButton,
}

const fn bind(token: &'static str, button: VirtualButton) -> BindEntry {
    BindEntry { token, button }
}

/// Every bind command. Checked before the action registry.
pub static BIND_TABLE: &[BindEntry] = &[
    bind("FAST_FORWARD", VirtualButton::FastForward),
    bind("FAST_FORWARD_HOLD", VirtualButton::FastForwardHold),
    bind("SLOWMOTION", VirtualButton::SlowMotion),
    bind("SLOWMOTION_HOLD", VirtualButton::SlowMotionHold),
    bind("LOAD_STATE", VirtualButton::LoadState),
    bind("SAVE_STATE", VirtualButton::SaveState),
    bind("FULLSCREEN_TOGGLE", VirtualButton::FullscreenToggle),
    bind("CLOSE_CONTENT", VirtualButton::CloseContent),
    bind("QUIT", VirtualButton::Quit),
    bind("STATE_SLOT_PLUS", VirtualButton::StateSlotPlus),
    bind("STATE_SLOT_MINUS", VirtualButton::StateSlotMinus),
    bind("REWIND", VirtualButton::Rewind),
    bind("BSV_RECORD_TOGGLE", VirtualButton::BsvRecordToggle),
    bind("PAUSE_TOGGLE", VirtualButton::PauseToggle),
    bind("FRAMEADVANCE", VirtualButton::FrameAdvance),
    bind("RESET", VirtualButton::Reset),
    bind("SHADER_NEXT", VirtualButton::ShaderNext),
    bind("SHADER_PREV", VirtualButton::ShaderPrev),
    bind("CHEAT_INDEX_PLUS", VirtualButton::CheatIndexPlus),
    bind("CHEAT_INDEX_MINUS", VirtualButton::CheatIndexMinus),
    bind("CHEAT_TOGGLE", VirtualButton::CheatToggle),
    bind("SCREENSHOT", VirtualButton::Screenshot),
    bind("MUTE", VirtualButton::Mute),
    bind("OSK", VirtualButton::Osk),
    bind("FPS_TOGGLE", VirtualButton::FpsToggle),
    bind("SEND_DEBUG_INFO", VirtualButton::SendDebugInfo),
    bind("NETPLAY_HOST_TOGGLE", VirtualButton::NetplayHostToggle),
    bind("NETPLAY_GAME_WATCH", VirtualButton::NetplayGameWatch),
    bind("VOLUME_UP", VirtualButton::VolumeUp),
    bind("VOLUME_DOWN", VirtualButton::VolumeDown),
    bind("OVERLAY_NEXT", VirtualButton::OverlayNext),
    bind("DISK_EJECT_TOGGLE", VirtualButton::DiskEjectToggle),
    bind("DISK_NEXT", VirtualButton::DiskNext),
    bind("DISK_PREV", VirtualButton::DiskPrev),
    bind("GRAB_MOUSE_TOGGLE", VirtualButton::GrabMouseToggle),
    bind("UI_COMPANION_TOGGLE", VirtualButton::UiCompanionToggle),
    bind("GAME_FOCUS_TOGGLE", VirtualButton::GameFocusToggle),
    bind("MENU_TOGGLE", VirtualButton::MenuToggle),
    bind("RECORDING_TOGGLE", VirtualButton::RecordingToggle),
    bind("STREAMING_TOGGLE", VirtualButton::StreamingToggle),
    bind("RUNAHEAD_TOGGLE", VirtualButton::RunaheadToggle),
    bind("MENU_UP", VirtualButton::JoypadUp),
    bind("MENU_DOWN", VirtualButton::JoypadDown),
    bind("MENU_LEFT", VirtualButton::JoypadLeft),
    bind("MENU_RIGHT", VirtualButton::JoypadRight),
    bind("MENU_A", VirtualButton::JoypadA),
    bind("MENU_B", VirtualButton::JoypadB),
    bind("AI_SERVICE", VirtualButton::AiService),
];

/// Exact, case-sensitive lookup.
pub fn lookup_bind(token: &str) -> Option<VirtualButton> {
    BIND_TABLE
        .iter()
        .find(|entry| entry.token == token)
        .map(|entry| entry.button)
}
