//! Built-in shader programs
//!
//! Both programs follow the parameter block layout in
//! [`parameters`](crate::gfx::resources::parameters).

use crate::error::ResourceError;
use crate::gfx::device::{GraphicsDevice, ShaderDescriptor, ShaderStage};
use crate::gfx::resources::material::ShaderPair;

pub const BASIC_VERTEX_SHADER: &str = include_str!("shaders/basic_vertex.wgsl");
pub const BASIC_PIXEL_SHADER: &str = include_str!("shaders/basic_pixel.wgsl");

/// Compiles the built-in lit program pair on `device`.
pub fn basic_shader_pair(device: &dyn GraphicsDevice) -> Result<ShaderPair, ResourceError> {
    let vertex = device.create_shader(&ShaderDescriptor {
        label: "basic_vertex",
        stage: ShaderStage::Vertex,
        source: BASIC_VERTEX_SHADER,
    })?;
    let pixel = device.create_shader(&ShaderDescriptor {
        label: "basic_pixel",
        stage: ShaderStage::Pixel,
        source: BASIC_PIXEL_SHADER,
    })?;
    ShaderPair::new(device, vertex, pixel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::HeadlessDevice;

    #[test]
    fn test_entry_points_present() {
        assert!(BASIC_VERTEX_SHADER.contains("fn vs_main"));
        assert!(BASIC_PIXEL_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn test_basic_pair_has_matching_stages() {
        let device = HeadlessDevice::new();
        let pair = basic_shader_pair(&device).unwrap();
        assert_eq!(device.shader_stage(pair.vertex()), Some(ShaderStage::Vertex));
        assert_eq!(device.shader_stage(pair.pixel()), Some(ShaderStage::Pixel));
    }
}
