//! Viewer abstraction: a first-person camera driven by polled input.

pub mod camera;
pub mod camera_controller;
pub mod camera_utils;

// Re-export main types
pub use camera::{Camera, CameraConfig};
pub use camera_controller::CameraBindings;
pub use camera_utils::{convert_matrix4_to_array, look_to_lh, perspective_lh};
