//! Input subsystem.
//!
//! The engine drives an [`Input`] implementation once per tick with the events
//! the window produced while polling. Public types are platform-agnostic;
//! window backends translate their native events into [`InputEvent`]s.

mod frame;
mod state;
mod system;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use system::InputSystem;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent,
};

/// Input collaborator contract.
///
/// `init` and `shutdown` bracket one engine lifetime; `update` runs once per
/// tick after the window polled its events. Queries default to "nothing held".
pub trait Input {
    fn init(&mut self);

    fn update(&mut self, events: &[InputEvent]);

    fn shutdown(&mut self);

    fn is_key_down(&self, key: Key) -> bool {
        let _ = key;
        false
    }

    /// True only on the tick the key went down.
    fn is_key_pressed(&self, key: Key) -> bool {
        let _ = key;
        false
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        let _ = button;
        false
    }

    /// Pointer position in logical pixels, `None` when outside the window.
    fn mouse_position(&self) -> Option<(f32, f32)> {
        None
    }
}
