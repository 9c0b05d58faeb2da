use super::frame::InputFrame;
use super::state::InputState;
use super::types::{InputEvent, Key, MouseButton};
use super::Input;

/// Default input collaborator: tracks state from the window's event stream.
#[derive(Debug, Default)]
pub struct InputSystem {
    state: InputState,
    frame: InputFrame,
    active: bool,
}

impl InputSystem {
    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn frame(&self) -> &InputFrame {
        &self.frame
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Input for InputSystem {
    fn init(&mut self) {
        self.state.reset();
        self.frame.clear();
        self.active = true;
        log::debug!("input initialized");
    }

    fn update(&mut self, events: &[InputEvent]) {
        if !self.active {
            return;
        }

        self.frame.clear();
        for ev in events {
            self.state.apply_event(&mut self.frame, ev);
        }
    }

    fn shutdown(&mut self) {
        self.state.reset();
        self.frame.clear();
        self.active = false;
        log::debug!("input shut down");
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.state.button_down(button)
    }

    fn mouse_position(&self) -> Option<(f32, f32)> {
        self.state.pointer_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyState, MouseButtonState, MouseWheelDelta, PointerButtonEvent};

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    fn active() -> InputSystem {
        let mut input = InputSystem::default();
        input.init();
        input
    }

    #[test]
    fn pressed_lasts_one_update() {
        let mut input = active();

        input.update(&[key(Key::Space, KeyState::Pressed)]);
        assert!(input.is_key_pressed(Key::Space));
        assert!(input.is_key_down(Key::Space));

        input.update(&[]);
        assert!(!input.is_key_pressed(Key::Space));
        assert!(input.is_key_down(Key::Space));

        input.update(&[key(Key::Space, KeyState::Released)]);
        assert!(!input.is_key_down(Key::Space));
        assert!(input.frame().keys_released.contains(&Key::Space));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = active();
        input.update(&[
            key(Key::W, KeyState::Pressed),
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 3.0,
                y: 4.0,
            }),
        ]);
        assert!(input.is_mouse_button_down(MouseButton::Left));
        assert_eq!(input.mouse_position(), Some((3.0, 4.0)));

        input.update(&[InputEvent::Focused(false)]);
        assert!(!input.is_key_down(Key::W));
        assert!(!input.is_mouse_button_down(MouseButton::Left));
    }

    #[test]
    fn wheel_and_text_accumulate_per_tick() {
        let mut input = active();
        input.update(&[
            InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }),
            InputEvent::MouseWheel(MouseWheelDelta::Pixel { x: 0.0, y: 240.0 }),
            InputEvent::Text("h".into()),
            InputEvent::Text("i".into()),
        ]);
        assert_eq!(input.frame().wheel, (0.0, 3.0));
        assert_eq!(input.frame().text, "hi");
    }

    #[test]
    fn inactive_system_ignores_events() {
        let mut input = InputSystem::default();
        input.update(&[key(Key::A, KeyState::Pressed)]);
        assert!(!input.is_key_down(Key::A));

        let mut input = active();
        input.update(&[key(Key::A, KeyState::Pressed)]);
        input.shutdown();
        assert!(!input.is_active());
        assert!(!input.is_key_down(Key::A));
    }
}
