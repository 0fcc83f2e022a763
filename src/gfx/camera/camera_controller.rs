use winit::{event::MouseButton, keyboard::KeyCode};

/// Maps camera motion commands onto keys and the look button.
///
/// Forward, back, left and right move along the camera's own axes; up and
/// down move along world Y. Looking only happens while `look` is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub look: MouseButton,
}

impl Default for CameraBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::Space,
            down: KeyCode::KeyX,
            look: MouseButton::Left,
        }
    }
}

impl CameraBindings {
    pub fn with_look_button(mut self, button: MouseButton) -> Self {
        self.look = button;
        self
    }

    pub fn with_vertical_keys(mut self, up: KeyCode, down: KeyCode) -> Self {
        self.up = up;
        self.down = down;
        self
    }
}
