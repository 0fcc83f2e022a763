//! Shader parameter blocks
//!
//! GPU layouts of the per-frame and per-draw parameter blocks. Every struct here
//! MUST match the corresponding struct in `rendering/shaders/*.wgsl` exactly.

use cgmath::{Matrix4, Vector3, Vector4};

use crate::gfx::camera::convert_matrix4_to_array;
use crate::gfx::scene::light::{Light, LightCollection, MAX_LIGHTS};

/// One light as the pixel program sees it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub color: [f32; 3],
    pub intensity: f32,
    pub direction: [f32; 3],
    pub range: f32,
    pub position: [f32; 3],
    pub spot_falloff: f32,
    pub kind: u32,
    _padding: [u32; 3],
}
// 4 * 16 = 64 bytes

impl From<&Light> for LightUniform {
    fn from(light: &Light) -> Self {
        Self {
            color: light.color.into(),
            intensity: light.intensity,
            direction: light.direction.into(),
            range: light.range,
            position: light.position.into(),
            spot_falloff: light.spot_falloff,
            kind: light.kind as u32,
            _padding: [0; 3],
        }
    }
}

/// Data shared by every draw of a frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameParameters {
    pub lights: [LightUniform; MAX_LIGHTS],
    pub camera_position: [f32; 3],
    pub light_count: u32,
}
// 16 * 64 + 16 = 1040 bytes

impl FrameParameters {
    pub fn new(lights: &LightCollection, camera_position: Vector3<f32>) -> Self {
        let mut uniforms: [LightUniform; MAX_LIGHTS] = bytemuck::Zeroable::zeroed();
        for (slot, light) in uniforms.iter_mut().zip(lights.iter()) {
            *slot = LightUniform::from(light);
        }
        Self {
            lights: uniforms,
            camera_position: camera_position.into(),
            light_count: lights.len() as u32,
        }
    }
}

/// Per-draw vertex program block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexParameters {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub color_tint: [f32; 4],
}
// 3 * 64 + 16 = 208 bytes

impl VertexParameters {
    pub fn new(
        world: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        color_tint: Vector4<f32>,
    ) -> Self {
        Self {
            world: convert_matrix4_to_array(world),
            view: convert_matrix4_to_array(view),
            projection: convert_matrix4_to_array(projection),
            color_tint: color_tint.into(),
        }
    }
}

/// Per-draw pixel program block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PixelParameters {
    pub color_tint: [f32; 4],
    pub shininess: f32,
    _padding: [f32; 3],
}
// 16 + 16 = 32 bytes

impl PixelParameters {
    pub fn new(color_tint: Vector4<f32>, shininess: f32) -> Self {
        Self {
            color_tint: color_tint.into(),
            shininess,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_block_sizes_match_shader_layouts() {
        assert_eq!(size_of::<LightUniform>(), 64);
        assert_eq!(size_of::<FrameParameters>(), 1040);
        assert_eq!(size_of::<VertexParameters>(), 208);
        assert_eq!(size_of::<PixelParameters>(), 32);
    }

    #[test]
    fn test_frame_parameters_pack_lights_in_order() {
        let mut lights = LightCollection::new();
        lights
            .push(Light::ambient(Vector3::new(0.2, 0.2, 0.2), 1.0))
            .unwrap();
        lights
            .push(Light::point(
                Vector3::new(1.0, 2.0, 3.0),
                5.0,
                Vector3::new(1.0, 0.5, 0.0),
                2.0,
            ))
            .unwrap();

        let frame = FrameParameters::new(&lights, Vector3::new(0.0, 1.0, -5.0));

        assert_eq!(frame.light_count, 2);
        assert_eq!(frame.camera_position, [0.0, 1.0, -5.0]);
        assert_eq!(frame.lights[0].kind, 3);
        assert_eq!(frame.lights[1].kind, 1);
        assert_eq!(frame.lights[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(frame.lights[2].kind, 0);
        assert_eq!(frame.lights[2].intensity, 0.0);
    }
}
