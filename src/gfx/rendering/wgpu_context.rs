//! [`RenderContext`] implementation that renders into a window surface.
//!
//! Calls made through the context are recorded and encoded into a single
//! render pass when the frame is presented. Parameter blocks map onto three
//! bind groups:
//!
//! - group 0: per-frame block (lights, camera position)
//! - group 1: per-draw vertex and pixel blocks, addressed by dynamic offset
//! - group 2: diffuse texture, normal map and sampler

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RenderError, ResourceError};
use crate::gfx::device::{
    BufferId, IndexFormat, ParameterBlock, RenderContext, SamplerFilter, ShaderId, ShaderStage,
    TextureSet,
};
use crate::gfx::resources::parameters::{FrameParameters, PixelParameters, VertexParameters};
use crate::gfx::resources::texture_resource::TextureResource;
use crate::wgpu_utils::binding_types;
use crate::wgpu_utils::{DynamicUniformRing, UniformBuffer};

use super::pipeline_cache::{PipelineCache, PipelineConfig};
use super::wgpu_device::WgpuDevice;

const VERTEX_BLOCK_SIZE: usize = std::mem::size_of::<VertexParameters>();
const PIXEL_BLOCK_SIZE: usize = std::mem::size_of::<PixelParameters>();
const FRAME_BLOCK_SIZE: usize = std::mem::size_of::<FrameParameters>();

/// Initial size of the per-draw uniform ring
const INITIAL_RING_CAPACITY: u64 = 64 * 1024;

/// Surface settings for a [`WgpuRenderContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClearValues {
    color: [f32; 4],
    depth: f32,
    stencil: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct Bindings {
    shaders: Option<(ShaderId, ShaderId)>,
    textures: TextureSet,
    vertex_buffer: Option<(BufferId, u32, u64)>,
    index_buffer: Option<(BufferId, IndexFormat)>,
    draw_offsets: Option<[u32; 2]>,
}

/// Staged parameter bytes waiting for a flush
#[derive(Debug, Default)]
struct StagedParameters {
    frame: Option<Vec<u8>>,
    vertex: Vec<u8>,
    pixel: Vec<u8>,
    draw_dirty: bool,
}

struct DrawCommand {
    pipeline: wgpu::RenderPipeline,
    texture_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_offset: u64,
    index_buffer: wgpu::Buffer,
    index_format: wgpu::IndexFormat,
    offsets: [u32; 2],
    index_count: u32,
    first_index: u32,
    base_vertex: i32,
}

struct FallbackTextures {
    diffuse: TextureResource,
    normal: TextureResource,
    sampler: wgpu::Sampler,
}

/// Window-backed render context
pub struct WgpuRenderContext {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    gpu: Arc<WgpuDevice>,
    depth_texture: TextureResource,
    target: Option<wgpu::SurfaceTexture>,

    frame_uniform: UniformBuffer<FrameParameters>,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_ring: DynamicUniformRing,
    draw_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    texture_groups: HashMap<TextureSet, wgpu::BindGroup>,
    fallback: FallbackTextures,
    pipelines: PipelineCache,

    bindings: Bindings,
    staged: StagedParameters,
    clear: Option<ClearValues>,
    draws: Vec<DrawCommand>,
    deferred_error: Option<RenderError>,
}

impl WgpuRenderContext {
    /// Creates a render context for the given window
    ///
    /// Requests an adapter and device, configures the surface and acquires the
    /// first render target so the context starts with targets bound.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `surface` - Initial size and presentation mode
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        surface_config: SurfaceConfig,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: surface_config.width.max(1),
            height: surface_config.height.max(1),
            present_mode: present_mode(surface_config.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let device = Arc::new(device);
        let queue = Arc::new(queue);
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let gpu = Arc::new(WgpuDevice::new(device.clone(), queue.clone()));

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // Group 0: shared per-frame parameters
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Parameters Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                binding_types::uniform(),
            )],
        });
        let frame_uniform = UniformBuffer::<FrameParameters>::new(&device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Parameters"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform.binding_resource(),
            }],
        });

        // Group 1: per-draw vertex and pixel blocks
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Parameters Layout"),
            entries: &[
                binding_types::entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    binding_types::uniform_dynamic(VERTEX_BLOCK_SIZE as u64),
                ),
                binding_types::entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::uniform_dynamic(PIXEL_BLOCK_SIZE as u64),
                ),
            ],
        });
        let draw_ring = DynamicUniformRing::new(
            &device,
            "Draw Parameters",
            alignment,
            INITIAL_RING_CAPACITY,
        );
        let draw_bind_group = create_draw_bind_group(&device, &draw_layout, draw_ring.buffer());

        // Group 2: textures
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Textures Layout"),
            entries: &[
                binding_types::entry(0, wgpu::ShaderStages::FRAGMENT, binding_types::texture_2d()),
                binding_types::entry(1, wgpu::ShaderStages::FRAGMENT, binding_types::texture_2d()),
                binding_types::entry(
                    2,
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        let fallback = FallbackTextures {
            diffuse: TextureResource::from_rgba8(
                &device,
                &queue,
                &[255, 255, 255, 255],
                1,
                1,
                "Fallback Diffuse",
                wgpu::TextureFormat::Rgba8UnormSrgb,
            ),
            // Tangent-space +Z
            normal: TextureResource::from_rgba8(
                &device,
                &queue,
                &[128, 128, 255, 255],
                1,
                1,
                "Fallback Normal",
                wgpu::TextureFormat::Rgba8Unorm,
            ),
            sampler: gpu.raw_sampler("Fallback Sampler", SamplerFilter::Linear),
        };

        let pipelines = PipelineCache::new(
            &device,
            &[&frame_layout, &draw_layout, &texture_layout],
            PipelineConfig::default()
                .with_label("Scene Pipeline")
                .with_color_format(format),
        );

        let mut context = Self {
            surface,
            config,
            gpu,
            depth_texture,
            target: None,
            frame_uniform,
            frame_bind_group,
            draw_layout,
            draw_ring,
            draw_bind_group,
            texture_layout,
            texture_groups: HashMap::new(),
            fallback,
            pipelines,
            bindings: Bindings::default(),
            staged: StagedParameters::default(),
            clear: None,
            draws: Vec::new(),
            deferred_error: None,
        };
        context.rebind_targets()?;

        log::info!(
            "Render context ready: {}x{} {:?} ({:?})",
            context.config.width,
            context.config.height,
            context.config.format,
            context.config.present_mode
        );
        Ok(context)
    }

    /// Device handle used to create meshes, shaders and textures for this context
    pub fn device(&self) -> Arc<WgpuDevice> {
        self.gpu.clone()
    }

    /// Returns current surface dimensions
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Handles window resize events
    ///
    /// Zero sizes (minimized windows) are ignored. The depth texture is
    /// recreated and a fresh target acquired.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        // The old target must be released before reconfiguring
        let had_target = self.target.take().is_some();
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.gpu.device(), &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(self.gpu.device(), &self.config, "depth_texture");

        if had_target {
            self.rebind_targets()?;
        }
        Ok(())
    }

    /// Enables or disables vertical sync
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        let had_target = self.target.take().is_some();
        self.surface.configure(self.gpu.device(), &self.config);
        if had_target {
            if let Err(e) = self.rebind_targets() {
                log::warn!("Failed to reacquire target after vsync change: {}", e);
            }
        }
    }

    fn defer(&mut self, error: RenderError) {
        log::warn!("Dropping draw: {}", error);
        if self.deferred_error.is_none() {
            self.deferred_error = Some(error);
        }
    }

    fn flush_frame_block(&mut self, bytes: &[u8]) {
        if bytes.len() != FRAME_BLOCK_SIZE {
            self.defer(RenderError::Backend(format!(
                "per-frame block is {} bytes, expected {}",
                bytes.len(),
                FRAME_BLOCK_SIZE
            )));
            return;
        }
        let parameters: FrameParameters = bytemuck::pod_read_unaligned(bytes);
        self.frame_uniform.update_content(self.gpu.queue(), parameters);
    }

    fn texture_group(&mut self, textures: TextureSet) -> Result<wgpu::BindGroup, RenderError> {
        if let Some(group) = self.texture_groups.get(&textures) {
            return Ok(group.clone());
        }

        let diffuse = match textures.diffuse {
            Some(id) => self
                .gpu
                .texture_view(id)
                .ok_or(ResourceError::UnknownTexture(id))?,
            None => self.fallback.diffuse.view.clone(),
        };
        let normal = match textures.normal {
            Some(id) => self
                .gpu
                .texture_view(id)
                .ok_or(ResourceError::UnknownTexture(id))?,
            None => self.fallback.normal.view.clone(),
        };
        let sampler = match textures.sampler.and_then(|id| self.gpu.sampler(id)) {
            Some(sampler) => sampler,
            None => {
                if let Some(id) = textures.sampler {
                    log::warn!("Unknown sampler {:?}, using default", id);
                }
                self.fallback.sampler.clone()
            }
        };

        let group = self
            .gpu
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Material Textures"),
                layout: &self.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&diffuse),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&normal),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
        self.texture_groups.insert(textures, group.clone());
        Ok(group)
    }

    fn record_draw(
        &mut self,
        index_count: u32,
        first_index: u32,
        base_vertex: i32,
    ) -> Result<DrawCommand, RenderError> {
        let bindings = self.bindings;
        let (vs, ps) = bindings
            .shaders
            .ok_or_else(|| RenderError::Backend("no shaders bound".to_string()))?;
        let (vertex_id, stride, vertex_offset) = bindings
            .vertex_buffer
            .ok_or_else(|| RenderError::Backend("no vertex buffer bound".to_string()))?;
        let (index_id, index_format) = bindings
            .index_buffer
            .ok_or_else(|| RenderError::Backend("no index buffer bound".to_string()))?;
        let offsets = bindings
            .draw_offsets
            .ok_or_else(|| RenderError::Backend("per-draw parameters never flushed".to_string()))?;

        let vertex_module = self
            .gpu
            .shader_module(vs)
            .ok_or(ResourceError::UnknownShader(vs))?;
        let pixel_module = self
            .gpu
            .shader_module(ps)
            .ok_or(ResourceError::UnknownShader(ps))?;
        let pipeline = self.pipelines.get_or_create(
            self.gpu.device(),
            (vs, ps, stride),
            &vertex_module,
            &pixel_module,
        )?;

        let vertex_buffer = self
            .gpu
            .buffer(vertex_id)
            .ok_or(ResourceError::UnknownBuffer(vertex_id))?;
        let index_buffer = self
            .gpu
            .buffer(index_id)
            .ok_or(ResourceError::UnknownBuffer(index_id))?;
        let texture_group = self.texture_group(bindings.textures)?;

        Ok(DrawCommand {
            pipeline,
            texture_group,
            vertex_buffer,
            vertex_offset,
            index_buffer,
            index_format: wgpu_index_format(index_format),
            offsets,
            index_count,
            first_index,
            base_vertex,
        })
    }

    fn encode_and_submit(&mut self, target: &wgpu::SurfaceTexture) {
        if self.draw_ring.upload(self.gpu.device(), self.gpu.queue()) {
            self.draw_bind_group =
                create_draw_bind_group(self.gpu.device(), &self.draw_layout, self.draw_ring.buffer());
        }

        let view = target
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (color_load, depth_load, stencil_load) = load_ops(self.clear);

        let mut encoder =
            self.gpu
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: stencil_load,
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for draw in &self.draws {
                render_pass.set_pipeline(&draw.pipeline);
                render_pass.set_bind_group(1, &self.draw_bind_group, &draw.offsets);
                render_pass.set_bind_group(2, &draw.texture_group, &[]);
                render_pass.set_vertex_buffer(0, draw.vertex_buffer.slice(draw.vertex_offset..));
                render_pass.set_index_buffer(draw.index_buffer.slice(..), draw.index_format);
                render_pass.draw_indexed(
                    draw.first_index..draw.first_index + draw.index_count,
                    draw.base_vertex,
                    0..1,
                );
            }
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }

    fn acquire_target(&mut self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.config);
                self.surface
                    .get_current_texture()
                    .map_err(|e| RenderError::Surface(e.to_string()))
            }
            Err(e) => Err(RenderError::Surface(e.to_string())),
        }
    }
}

impl RenderContext for WgpuRenderContext {
    fn clear(&mut self, color: [f32; 4], depth: f32, stencil: u32) {
        // Everything recorded so far would be overwritten
        self.draws.clear();
        self.clear = Some(ClearValues {
            color,
            depth,
            stencil,
        });
    }

    fn set_shaders(&mut self, vertex: ShaderId, pixel: ShaderId) {
        self.bindings.shaders = Some((vertex, pixel));
    }

    fn set_textures(&mut self, textures: TextureSet) {
        self.bindings.textures = textures;
    }

    fn write_parameters(&mut self, stage: ShaderStage, block: ParameterBlock, data: &[u8]) {
        match (stage, block) {
            (_, ParameterBlock::PerFrame) => self.staged.frame = Some(data.to_vec()),
            (ShaderStage::Vertex, ParameterBlock::PerDraw) => {
                self.staged.vertex = data.to_vec();
                self.staged.draw_dirty = true;
            }
            (ShaderStage::Pixel, ParameterBlock::PerDraw) => {
                self.staged.pixel = data.to_vec();
                self.staged.draw_dirty = true;
            }
        }
    }

    fn flush_parameters(&mut self) {
        if let Some(frame) = self.staged.frame.take() {
            self.flush_frame_block(&frame);
        }
        if self.staged.draw_dirty {
            let vertex = self.draw_ring.push(&self.staged.vertex, VERTEX_BLOCK_SIZE);
            let pixel = self.draw_ring.push(&self.staged.pixel, PIXEL_BLOCK_SIZE);
            self.bindings.draw_offsets = Some([vertex, pixel]);
            self.staged.draw_dirty = false;
        }
    }

    fn set_vertex_buffer(&mut self, buffer: BufferId, stride: u32, offset: u64) {
        self.bindings.vertex_buffer = Some((buffer, stride, offset));
    }

    fn set_index_buffer(&mut self, buffer: BufferId, format: IndexFormat) {
        self.bindings.index_buffer = Some((buffer, format));
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, base_vertex: i32) {
        match self.record_draw(index_count, first_index, base_vertex) {
            Ok(draw) => self.draws.push(draw),
            Err(e) => self.defer(e),
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let target = self.target.take().ok_or(RenderError::TargetsUnbound)?;

        self.encode_and_submit(&target);
        target.present();

        self.draws.clear();
        self.clear = None;
        self.bindings.draw_offsets = None;

        match self.deferred_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn rebind_targets(&mut self) -> Result<(), RenderError> {
        if self.target.is_some() {
            return Ok(());
        }
        let target = self.acquire_target()?;
        self.target = Some(target);
        Ok(())
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::Immediate
    }
}

fn wgpu_index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

/// Load operations for the main pass; without a clear the previous contents are kept
fn load_ops(
    clear: Option<ClearValues>,
) -> (
    wgpu::LoadOp<wgpu::Color>,
    wgpu::LoadOp<f32>,
    wgpu::LoadOp<u32>,
) {
    match clear {
        Some(values) => {
            let [r, g, b, a] = values.color;
            (
                wgpu::LoadOp::Clear(wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: a as f64,
                }),
                wgpu::LoadOp::Clear(values.depth),
                wgpu::LoadOp::Clear(values.stencil),
            )
        }
        None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load, wgpu::LoadOp::Load),
    }
}

fn create_draw_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Parameters"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(VERTEX_BLOCK_SIZE as u64),
                }),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(PIXEL_BLOCK_SIZE as u64),
                }),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_values_become_clear_ops() {
        let (color, depth, stencil) = load_ops(Some(ClearValues {
            color: [0.4, 0.6, 0.75, 0.0],
            depth: 1.0,
            stencil: 0,
        }));
        match color {
            wgpu::LoadOp::Clear(c) => {
                assert!((c.r - 0.4).abs() < 1e-6);
                assert!((c.b - 0.75).abs() < 1e-6);
                assert_eq!(c.a, 0.0);
            }
            _ => panic!("expected a color clear"),
        }
        assert!(matches!(depth, wgpu::LoadOp::Clear(d) if d == 1.0));
        assert!(matches!(stencil, wgpu::LoadOp::Clear(0)));
    }

    #[test]
    fn test_missing_clear_keeps_contents() {
        let (color, depth, stencil) = load_ops(None);
        assert!(matches!(color, wgpu::LoadOp::Load));
        assert!(matches!(depth, wgpu::LoadOp::Load));
        assert!(matches!(stencil, wgpu::LoadOp::Load));
    }

    #[test]
    fn test_present_mode_follows_vsync() {
        assert_eq!(present_mode(true), wgpu::PresentMode::Fifo);
        assert_eq!(present_mode(false), wgpu::PresentMode::Immediate);
        assert_eq!(wgpu_index_format(IndexFormat::Uint16), wgpu::IndexFormat::Uint16);
    }

    #[test]
    fn test_block_sizes_fit_uniform_alignment() {
        assert_eq!(VERTEX_BLOCK_SIZE % 16, 0);
        assert_eq!(PIXEL_BLOCK_SIZE % 16, 0);
        assert_eq!(FRAME_BLOCK_SIZE % 16, 0);
    }
}
