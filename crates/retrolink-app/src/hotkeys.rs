//! Turn asserted hotkey buttons into frontend events and frame pacing.

use std::time::Duration;

use retrolink_command::Frontend;
use retrolink_types::event::EventCommand;
use retrolink_types::input::{ButtonState, VirtualButton};

/// The event a hotkey performs, if it maps onto one.
///
/// Joypad buttons belong to the core, and the speed controls are handled by
/// [`Pacing`].
pub fn event_for(button: VirtualButton) -> Option<EventCommand> {
    use VirtualButton as B;

    let event = match button {
        B::LoadState => EventCommand::LoadState,
        B::SaveState => EventCommand::SaveState,
        B::FullscreenToggle => EventCommand::FullscreenToggle,
        B::CloseContent => EventCommand::CloseContent,
        B::Quit => EventCommand::Quit,
        B::StateSlotPlus => EventCommand::SaveStateIncrement,
        B::StateSlotMinus => EventCommand::SaveStateDecrement,
        B::Rewind => EventCommand::RewindToggle,
        B::BsvRecordToggle => EventCommand::BsvRecordingToggle,
        B::PauseToggle => EventCommand::PauseToggle,
        B::Reset => EventCommand::Reset,
        B::ShaderNext => EventCommand::ShaderNext,
        B::ShaderPrev => EventCommand::ShaderPrev,
        B::CheatIndexPlus => EventCommand::CheatIndexPlus,
        B::CheatIndexMinus => EventCommand::CheatIndexMinus,
        B::CheatToggle => EventCommand::CheatToggle,
        B::Screenshot => EventCommand::TakeScreenshot,
        B::Mute => EventCommand::AudioMuteToggle,
        B::Osk => EventCommand::OskToggle,
        B::FpsToggle => EventCommand::FpsToggle,
        B::SendDebugInfo => EventCommand::SendDebugInfo,
        B::NetplayHostToggle => EventCommand::NetplayHostToggle,
        B::NetplayGameWatch => EventCommand::NetplayGameWatch,
        B::VolumeUp => EventCommand::VolumeUp,
        B::VolumeDown => EventCommand::VolumeDown,
        B::OverlayNext => EventCommand::OverlayNext,
        B::DiskEjectToggle => EventCommand::DiskEjectToggle,
        B::DiskNext => EventCommand::DiskNext,
        B::DiskPrev => EventCommand::DiskPrev,
        B::GrabMouseToggle => EventCommand::GrabMouseToggle,
        B::UiCompanionToggle => EventCommand::UiCompanionToggle,
        B::GameFocusToggle => EventCommand::GameFocusToggle,
        B::MenuToggle => EventCommand::MenuToggle,
        B::RecordingToggle => EventCommand::RecordingToggle,
        B::StreamingToggle => EventCommand::StreamingToggle,
        B::RunaheadToggle => EventCommand::RunaheadToggle,
        B::AiService => EventCommand::AiServiceToggle,
        _ => return None,
    };
    Some(event)
}

/// Perform the event of every pressed hotkey, in button order.
///
/// Returns the events performed.
pub fn apply(pressed: &ButtonState, frontend: &mut dyn Frontend) -> Vec<EventCommand> {
    let mut performed = Vec::new();
    for button in pressed.iter() {
        if button.is_joypad() {
            log::debug!("Joypad {button} pressed");
            continue;
        }
        let Some(event) = event_for(button) else {
            continue;
        };
        if !frontend.perform(event, None) {
            log::debug!("{event} declined");
        }
        performed.push(event);
    }
    performed
}

/// What the main loop should do with the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// Time to spend on the frame. `None` runs unthrottled.
    pub budget: Option<Duration>,
    /// Step one frame even if paused.
    pub advance: bool,
}

/// Fast-forward and slow-motion state.
///
/// The toggles flip on each press; the `_HOLD` variants apply only to the
/// frame they were asserted in.
#[derive(Debug, Clone)]
pub struct Pacing {
    frame_time: Duration,
    fast_forward: bool,
    slow_motion: bool,
}

impl Pacing {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / frame_rate.max(1),
            fast_forward: false,
            slow_motion: false,
        }
    }

    pub fn update(&mut self, pressed: &ButtonState) -> FramePlan {
        if pressed.is_pressed(VirtualButton::FastForward) {
            self.fast_forward = !self.fast_forward;
            log::info!("Fast forward {}", if self.fast_forward { "on" } else { "off" });
        }
        if pressed.is_pressed(VirtualButton::SlowMotion) {
            self.slow_motion = !self.slow_motion;
            log::info!("Slow motion {}", if self.slow_motion { "on" } else { "off" });
        }

        let fast = self.fast_forward || pressed.is_pressed(VirtualButton::FastForwardHold);
        let slow = self.slow_motion || pressed.is_pressed(VirtualButton::SlowMotionHold);
        let budget = if fast {
            None
        } else if slow {
            Some(self.frame_time * 2)
        } else {
            Some(self.frame_time)
        };

        FramePlan {
            budget,
            advance: pressed.is_pressed(VirtualButton::FrameAdvance),
        }
    }
}
