//! Per-frame input snapshots and mouse button edge tracking

use crate::math::ray::Ray;

/// Edge-aware state of the primary mouse button for one frame.
///
/// `Clicked` is reported only on the frame the button goes down; from the
/// next frame on a held button reads as `Pressed`. The states are mutually
/// exclusive, mirroring the host input system's key states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Released,
    /// Went down this frame
    Clicked,
    /// Held down since a previous frame
    Pressed,
}

impl ButtonState {
    /// Button is down in any form this frame
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Clicked | ButtonState::Pressed)
    }

    /// Button has been held since before this frame
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }

    /// Button went down this frame
    pub fn is_clicked(self) -> bool {
        self == ButtonState::Clicked
    }
}

/// Derives [`ButtonState`] edges from the raw down/up state the host reports
/// each frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonTracker {
    was_down: bool,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the raw button state for this frame, get the edge-aware state
    pub fn update(&mut self, down: bool) -> ButtonState {
        let state = match (self.was_down, down) {
            (false, true) => ButtonState::Clicked,
            (true, true) => ButtonState::Pressed,
            _ => ButtonState::Released,
        };
        self.was_down = down;
        state
    }
}

/// Everything the tools read from the host for one tick
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub button: ButtonState,
    /// Shift modifier, used for additive selection
    pub shift: bool,
    /// World-space mouse ray
    pub ray: Ray,
}

impl FrameInput {
    pub fn new(button: ButtonState, shift: bool, ray: Ray) -> Self {
        Self { button, shift, ray }
    }
}
