use cgmath::{Deg, Matrix4, Rad, Rotation, Vector2, Vector3, Zero};

use crate::gfx::transform::Transform;
use crate::input::InputSource;

use super::camera_controller::CameraBindings;
use super::camera_utils::{look_to_lh, perspective_lh};

/// Initial pose and projection parameters for a [`Camera`].
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub position: Vector3<f32>,
    /// Pitch, yaw and roll in radians.
    pub rotation: Vector3<f32>,
    pub aspect_ratio: f32,
    pub fov: Deg<f32>,
    pub near_clip: f32,
    pub far_clip: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Radians per pointer pixel per second.
    pub mouse_look_speed: f32,
    pub bindings: CameraBindings,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            aspect_ratio: 1920.0 / 1080.0,
            fov: Deg(45.0),
            near_clip: 0.01,
            far_clip: 100.0,
            movement_speed: 5.0,
            mouse_look_speed: 2.0,
            bindings: CameraBindings::default(),
        }
    }
}

impl CameraConfig {
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_fov(mut self, fov: Deg<f32>) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_clip_planes(mut self, near_clip: f32, far_clip: f32) -> Self {
        self.near_clip = near_clip;
        self.far_clip = far_clip;
        self
    }

    pub fn with_speeds(mut self, movement_speed: f32, mouse_look_speed: f32) -> Self {
        self.movement_speed = movement_speed;
        self.mouse_look_speed = mouse_look_speed;
        self
    }

    pub fn with_bindings(mut self, bindings: CameraBindings) -> Self {
        self.bindings = bindings;
        self
    }
}

/// First-person camera.
///
/// The view matrix is rebuilt by [`update`](Camera::update) and
/// [`update_view_matrix`](Camera::update_view_matrix); the projection matrix by
/// [`update_projection_matrix`](Camera::update_projection_matrix), which must be
/// called whenever the output aspect ratio changes.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,

    fov: Rad<f32>,
    near_clip: f32,
    far_clip: f32,
    aspect_ratio: f32,

    movement_speed: f32,
    mouse_look_speed: f32,
    bindings: CameraBindings,

    last_pointer: Option<Vector2<f32>>,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let mut transform = Transform::new();
        transform.set_position(config.position);
        transform.set_rotation(config.rotation);

        let mut camera = Self {
            transform,
            view_matrix: Matrix4::from_scale(1.0),
            projection_matrix: Matrix4::from_scale(1.0),
            fov: config.fov.into(),
            near_clip: config.near_clip,
            far_clip: config.far_clip,
            aspect_ratio: config.aspect_ratio,
            movement_speed: config.movement_speed,
            mouse_look_speed: config.mouse_look_speed,
            bindings: config.bindings,
            last_pointer: None,
        };
        camera.update_view_matrix();
        camera.update_projection_matrix(config.aspect_ratio);
        camera
    }

    /// Rebuilds the projection for a new output aspect ratio.
    pub fn update_projection_matrix(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.projection_matrix = perspective_lh(self.fov, aspect_ratio, self.near_clip, self.far_clip);
    }

    /// Rebuilds the view from the transform's position and orientation.
    pub fn update_view_matrix(&mut self) {
        let forward = self
            .transform
            .orientation()
            .rotate_vector(Vector3::unit_z());
        self.view_matrix = look_to_lh(self.transform.position(), forward, Vector3::unit_y());
    }

    /// Advances the camera by one frame of input, then rebuilds the view.
    pub fn update<I: InputSource + ?Sized>(&mut self, dt: f32, input: &I) {
        let step = self.movement_speed * dt;
        let bindings = self.bindings;

        if input.is_key_down(bindings.forward) {
            self.transform.move_relative(Vector3::new(0.0, 0.0, step));
        }
        if input.is_key_down(bindings.backward) {
            self.transform.move_relative(Vector3::new(0.0, 0.0, -step));
        }
        if input.is_key_down(bindings.right) {
            self.transform.move_relative(Vector3::new(step, 0.0, 0.0));
        }
        if input.is_key_down(bindings.left) {
            self.transform.move_relative(Vector3::new(-step, 0.0, 0.0));
        }
        if input.is_key_down(bindings.up) {
            self.transform.move_absolute(Vector3::new(0.0, step, 0.0));
        }
        if input.is_key_down(bindings.down) {
            self.transform.move_absolute(Vector3::new(0.0, -step, 0.0));
        }

        let pointer = input.pointer_position();
        if let Some(last) = self.last_pointer {
            if input.is_button_down(bindings.look) {
                let delta = (pointer - last) * (self.mouse_look_speed * dt);
                // Horizontal motion turns (yaw), vertical motion tilts (pitch).
                self.transform.rotate(Vector3::new(delta.y, delta.x, 0.0));
            }
        }
        self.last_pointer = Some(pointer);

        self.update_view_matrix();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the pose. Call [`update_view_matrix`](Self::update_view_matrix)
    /// afterwards if the view is read before the next [`update`](Self::update).
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn position(&self) -> Vector3<f32> {
        self.transform.position()
    }

    pub fn fov(&self) -> Rad<f32> {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near_clip, self.far_clip)
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed;
    }

    pub fn mouse_look_speed(&self) -> f32 {
        self.mouse_look_speed
    }

    pub fn set_mouse_look_speed(&mut self, speed: f32) {
        self.mouse_look_speed = speed;
    }

    pub fn bindings(&self) -> &CameraBindings {
        &self.bindings
    }
}
