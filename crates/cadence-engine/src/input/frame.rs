use std::collections::HashSet;

use super::types::{Key, MouseButton, MouseWheelDelta};

/// Transitions observed during one tick.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed
/// since the previous tick and is cleared at the start of every update.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Wheel motion accumulated this tick, in lines (pixels are divided by 120).
    pub wheel: (f32, f32),

    pub text: String,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = (0.0, 0.0);
        self.text.clear();
    }

    pub(crate) fn add_wheel(&mut self, delta: MouseWheelDelta) {
        let (x, y) = match delta {
            MouseWheelDelta::Line { x, y } => (x, y),
            MouseWheelDelta::Pixel { x, y } => (x / 120.0, y / 120.0),
        };
        self.wheel.0 += x;
        self.wheel.1 += y;
    }
}
