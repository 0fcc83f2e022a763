// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Materials, shader parameter blocks and wgpu textures.

pub mod material;
pub mod parameters;
pub mod texture_resource;

// Re-export main types
pub use material::{Material, PipelineBinding, ShaderPair, SurfaceParameters};
pub use parameters::{FrameParameters, LightUniform, PixelParameters, VertexParameters};
pub use texture_resource::TextureResource;
