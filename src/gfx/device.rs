//! Backend-agnostic device and pipeline binding surfaces.
//!
//! Scene objects never talk to wgpu directly. Resource creation goes through
//! [`GraphicsDevice`] and every per-frame binding, upload and draw goes through
//! [`RenderContext`]. The wgpu backend lives in
//! [`rendering`](crate::gfx::rendering); a headless implementation for tests and
//! tooling lives in [`headless`](crate::gfx::headless).

use std::fmt::Debug;

use crate::error::{RenderError, ResourceError};

/// Opaque handle to a GPU buffer owned by a [`GraphicsDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// Opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub usize);

/// Opaque handle to a sampled 2D texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Opaque handle to a texture sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerId(pub usize);

/// Pipeline stage a shader program runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

/// Usage of an immutable buffer created from initial contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// Width of the elements in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

/// Which parameter block a write targets.
///
/// `PerFrame` data is shared by every draw of the frame; `PerDraw` data is
/// replaced before each draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterBlock {
    PerFrame,
    PerDraw,
}

/// Filtering applied by a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerFilter {
    Nearest,
    #[default]
    Linear,
}

/// Textures bound alongside a shader program pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureSet {
    pub diffuse: Option<TextureId>,
    pub normal: Option<TextureId>,
    pub sampler: Option<SamplerId>,
}

/// Description of a shader program to compile.
#[derive(Debug, Clone, Copy)]
pub struct ShaderDescriptor<'a> {
    pub label: &'a str,
    pub stage: ShaderStage,
    /// WGSL source. Vertex programs expose `vs_main`, pixel programs `fs_main`.
    pub source: &'a str,
}

/// Creates and releases GPU resources.
///
/// Implementations are shared behind an `Arc` by every object that owns a
/// resource, so methods take `&self`.
pub trait GraphicsDevice: Send + Sync + Debug {
    /// Creates an immutable buffer sized exactly to `contents`.
    fn create_buffer_init(
        &self,
        label: &str,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Releases a buffer. Releasing an unknown or already released buffer is an error.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Compiles a shader program for one pipeline stage.
    fn create_shader(&self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError>;

    /// Stage of a previously created shader program.
    fn shader_stage(&self, id: ShaderId) -> Option<ShaderStage>;

    /// Uploads tightly packed RGBA8 pixels as a sampled 2D texture.
    fn create_texture_rgba8(
        &self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, ResourceError>;

    fn create_sampler(&self, label: &str, filter: SamplerFilter) -> Result<SamplerId, ResourceError>;
}

/// The pipeline binding surface the frame protocol drives.
///
/// Bindings made through a context persist until replaced, but callers must not
/// rely on them surviving across entities with different materials.
pub trait RenderContext {
    /// Resets the color target to `color` and depth/stencil to the given values.
    fn clear(&mut self, color: [f32; 4], depth: f32, stencil: u32);

    /// Binds a vertex and pixel shader program pair.
    fn set_shaders(&mut self, vertex: ShaderId, pixel: ShaderId);

    /// Binds the textures and sampler the pixel program samples from.
    fn set_textures(&mut self, textures: TextureSet);

    /// Stages parameter bytes for `stage`. Staged bytes reach the GPU on
    /// [`flush_parameters`](Self::flush_parameters).
    fn write_parameters(&mut self, stage: ShaderStage, block: ParameterBlock, data: &[u8]);

    /// Makes every staged parameter write visible to the next draw.
    fn flush_parameters(&mut self);

    fn set_vertex_buffer(&mut self, buffer: BufferId, stride: u32, offset: u64);

    fn set_index_buffer(&mut self, buffer: BufferId, format: IndexFormat);

    /// Issues an indexed draw of `index_count` indices.
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, base_vertex: i32);

    /// Presents the frame. Presentation invalidates the target bindings.
    fn present(&mut self) -> Result<(), RenderError>;

    /// Rebinds the color and depth targets after [`present`](Self::present).
    fn rebind_targets(&mut self) -> Result<(), RenderError>;
}
