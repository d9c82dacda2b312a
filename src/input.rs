//! Two-button steering surface
//!
//! Each on-screen button tracks its own press state. Dragging a held pointer
//! off the button counts as a release so the ship never gets stuck steering.

use crate::sim::TickInput;

/// Which steering button an event targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerButton {
    Left,
    Right,
}

/// Pointer lifecycle events on a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
    Release,
    /// Pointer left the button while still held
    Leave,
}

/// Press state for both steering buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSurface {
    left: bool,
    right: bool,
}

impl InputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a pointer event to one button
    pub fn handle(&mut self, button: SteerButton, event: ButtonEvent) {
        let pressed = matches!(event, ButtonEvent::Press);
        match button {
            SteerButton::Left => self.left = pressed,
            SteerButton::Right => self.right = pressed,
        }
    }

    /// Map a keyboard key to a steering button
    pub fn button_for_key(key: &str) -> Option<SteerButton> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(SteerButton::Left),
            "ArrowRight" | "d" | "D" => Some(SteerButton::Right),
            _ => None,
        }
    }

    /// Drop both presses (focus loss, session change)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Current state as simulation input
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
        }
    }
}
