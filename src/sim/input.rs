//! Frame Input Snapshot
//!
//! One immutable input record per frame, captured by the embedding loop.
//! Edge-triggered buttons (pressed this frame) are distinct from held
//! buttons so components can implement one-shot triggers.

use serde::{Serialize, Deserialize};

/// Horizontal axis magnitude below which input counts as "no input".
pub const AXIS_DEADZONE: f32 = 0.01;

/// Input state for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Horizontal movement axis: -1.0 (left) to +1.0 (right).
    pub move_x: f32,

    /// Button flags (packed bits):
    /// - Bit 0: Jump pressed this frame (edge)
    /// - Bit 1: Jump held
    /// - Bit 2: Run modifier held
    /// - Bit 3: Interact pressed this frame (edge)
    pub flags: u8,
}

impl InputFrame {
    /// Jump edge flag bit.
    pub const FLAG_JUMP_PRESSED: u8 = 0x01;

    /// Jump held flag bit.
    pub const FLAG_JUMP_HELD: u8 = 0x02;

    /// Run modifier flag bit.
    pub const FLAG_RUN_HELD: u8 = 0x04;

    /// Interact edge flag bit.
    pub const FLAG_INTERACT_PRESSED: u8 = 0x08;

    /// Create an empty (idle) input frame.
    pub const fn new() -> Self {
        Self { move_x: 0.0, flags: 0 }
    }

    /// Create an input frame with a movement axis value.
    pub const fn with_move(move_x: f32) -> Self {
        Self { move_x, flags: 0 }
    }

    /// Builder-style flag set, for tests and scripted demos.
    #[must_use]
    pub const fn pressing(mut self, flag: u8) -> Self {
        self.flags |= flag;
        self
    }

    /// Set or clear a flag.
    pub fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Movement axis clamped to -1..=1.
    #[inline]
    pub fn move_axis(&self) -> f32 {
        self.move_x.clamp(-1.0, 1.0)
    }

    /// Whether the axis is outside the deadzone.
    #[inline]
    pub fn has_move(&self) -> bool {
        self.move_axis().abs() > AXIS_DEADZONE
    }

    /// Jump was pressed this frame.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.flags & Self::FLAG_JUMP_PRESSED != 0
    }

    /// Jump is held.
    #[inline]
    pub fn jump_held(&self) -> bool {
        self.flags & Self::FLAG_JUMP_HELD != 0
    }

    /// Run modifier is held.
    #[inline]
    pub fn run_held(&self) -> bool {
        self.flags & Self::FLAG_RUN_HELD != 0
    }

    /// Interact was pressed this frame.
    #[inline]
    pub fn interact_pressed(&self) -> bool {
        self.flags & Self::FLAG_INTERACT_PRESSED != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut input = InputFrame::new();
        assert!(!input.jump_pressed());

        input.set(InputFrame::FLAG_JUMP_PRESSED, true);
        input.set(InputFrame::FLAG_JUMP_HELD, true);
        assert!(input.jump_pressed());
        assert!(input.jump_held());
        assert!(!input.run_held());

        input.set(InputFrame::FLAG_JUMP_PRESSED, false);
        assert!(!input.jump_pressed());
        assert!(input.jump_held());
    }

    #[test]
    fn test_axis_clamp_and_deadzone() {
        assert_eq!(InputFrame::with_move(3.0).move_axis(), 1.0);
        assert_eq!(InputFrame::with_move(-2.0).move_axis(), -1.0);
        assert!(!InputFrame::with_move(0.005).has_move());
        assert!(InputFrame::with_move(-0.5).has_move());
    }
}
