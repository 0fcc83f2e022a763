//! Polled input state.
//!
//! The camera and gameplay controllers poll input once per frame through the
//! [`InputSource`] trait. [`InputState`] implements it by folding winit window
//! events into key, button and pointer state.

use std::collections::HashSet;

use cgmath::{Vector2, Zero};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Read-only view of the input devices for one frame.
pub trait InputSource {
    fn is_key_down(&self, key: KeyCode) -> bool;

    fn is_button_down(&self, button: MouseButton) -> bool;

    /// Pointer position in window coordinates.
    fn pointer_position(&self) -> Vector2<f32>;
}

/// Tracks keyboard and mouse state from window events.
#[derive(Debug, Clone)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer: Vector2<f32>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            pointer: Vector2::zero(),
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one window event into the tracked state.
    ///
    /// Returns true if the event was an input event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.set_key(key, event.state == ElementState::Pressed);
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_button(*button, *state == ElementState::Pressed);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.set_pointer(Vector2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::Focused(false) => {
                // Releases are never delivered to an unfocused window.
                self.keys_down.clear();
                self.buttons_down.clear();
                false
            }
            _ => false,
        }
    }

    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_down.insert(button);
        } else {
            self.buttons_down.remove(&button);
        }
    }

    pub fn set_pointer(&mut self, position: Vector2<f32>) {
        self.pointer = position;
    }
}

impl InputSource for InputState {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    fn pointer_position(&self) -> Vector2<f32> {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_and_release() {
        let mut input = InputState::new();
        input.set_key(KeyCode::KeyW, true);
        assert!(input.is_key_down(KeyCode::KeyW));
        input.set_key(KeyCode::KeyW, false);
        assert!(!input.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut input = InputState::new();
        input.set_key(KeyCode::KeyA, true);
        input.set_button(MouseButton::Left, true);

        assert!(!input.handle_event(&WindowEvent::Focused(false)));
        assert!(!input.is_key_down(KeyCode::KeyA));
        assert!(!input.is_button_down(MouseButton::Left));
    }

    #[test]
    fn test_pointer_position() {
        let mut input = InputState::new();
        input.set_pointer(Vector2::new(12.0, 48.0));
        assert_eq!(input.pointer_position(), Vector2::new(12.0, 48.0));
    }
}
