//! Surface materials
//!
//! A [`Material`] pairs a vertex and pixel program with the surface parameters
//! they read: color tint, shininess and optional textures. Materials are built
//! once, then shared between entities through `Arc`. Entities only see them
//! through the [`PipelineBinding`] capability.

use cgmath::Vector4;

use crate::error::ResourceError;
use crate::gfx::device::{
    GraphicsDevice, RenderContext, SamplerId, ShaderId, ShaderStage, TextureId, TextureSet,
};

/// A vertex program and a pixel program that are known to be of the right stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderPair {
    vertex: ShaderId,
    pixel: ShaderId,
}

impl ShaderPair {
    /// Checks both programs against the stages the device compiled them for.
    pub fn new(
        device: &dyn GraphicsDevice,
        vertex: ShaderId,
        pixel: ShaderId,
    ) -> Result<Self, ResourceError> {
        expect_stage(device, vertex, ShaderStage::Vertex)?;
        expect_stage(device, pixel, ShaderStage::Pixel)?;
        Ok(Self { vertex, pixel })
    }

    pub fn vertex(&self) -> ShaderId {
        self.vertex
    }

    pub fn pixel(&self) -> ShaderId {
        self.pixel
    }
}

fn expect_stage(
    device: &dyn GraphicsDevice,
    id: ShaderId,
    expected: ShaderStage,
) -> Result<(), ResourceError> {
    match device.shader_stage(id) {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(ResourceError::StageMismatch {
            id,
            expected,
            found,
        }),
        None => Err(ResourceError::UnknownShader(id)),
    }
}

/// Per-draw surface values a binding contributes to the parameter blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParameters {
    pub color_tint: Vector4<f32>,
    pub shininess: f32,
}

/// Something that can put the pipeline into the state an entity draws with.
pub trait PipelineBinding: Send + Sync {
    /// Binds the shader programs and textures.
    fn bind(&self, ctx: &mut dyn RenderContext);

    fn surface_parameters(&self) -> SurfaceParameters;
}

/// Material definition
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    color_tint: Vector4<f32>,
    shininess: f32,
    shaders: ShaderPair,
    textures: TextureSet,
}

impl Material {
    /// Creates a material. Negative shininess is clamped to zero.
    pub fn new(name: &str, color_tint: Vector4<f32>, shininess: f32, shaders: ShaderPair) -> Self {
        Self {
            name: name.to_string(),
            color_tint,
            shininess: shininess.max(0.0),
            shaders,
            textures: TextureSet::default(),
        }
    }

    /// Builder pattern: sample `texture` as the diffuse map.
    pub fn with_diffuse_texture(mut self, texture: TextureId, sampler: SamplerId) -> Self {
        self.textures.diffuse = Some(texture);
        self.textures.sampler = Some(sampler);
        self
    }

    /// Builder pattern: sample `texture` as the tangent-space normal map.
    pub fn with_normal_map(mut self, texture: TextureId, sampler: SamplerId) -> Self {
        self.textures.normal = Some(texture);
        self.textures.sampler = Some(sampler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color_tint(&self) -> Vector4<f32> {
        self.color_tint
    }

    pub fn set_color_tint(&mut self, tint: Vector4<f32>) {
        self.color_tint = tint;
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess.max(0.0);
    }

    pub fn vertex_shader(&self) -> ShaderId {
        self.shaders.vertex()
    }

    pub fn pixel_shader(&self) -> ShaderId {
        self.shaders.pixel()
    }

    pub fn textures(&self) -> TextureSet {
        self.textures
    }
}

impl PipelineBinding for Material {
    fn bind(&self, ctx: &mut dyn RenderContext) {
        ctx.set_shaders(self.shaders.vertex(), self.shaders.pixel());
        ctx.set_textures(self.textures);
    }

    fn surface_parameters(&self) -> SurfaceParameters {
        SurfaceParameters {
            color_tint: self.color_tint,
            shininess: self.shininess,
        }
    }
}
