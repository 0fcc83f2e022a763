//! [`GraphicsDevice`] implementation on top of wgpu.
//!
//! Resources live in a registry keyed by the handles handed out to scene
//! objects. The render context looks them up again when it encodes a frame.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use wgpu::util::DeviceExt;

use crate::error::ResourceError;
use crate::gfx::device::{
    BufferId, BufferUsage, GraphicsDevice, SamplerFilter, SamplerId, ShaderDescriptor, ShaderId,
    ShaderStage, TextureId,
};
use crate::gfx::resources::texture_resource::TextureResource;

#[derive(Default)]
struct Registry {
    next_id: usize,
    buffers: HashMap<BufferId, wgpu::Buffer>,
    shaders: HashMap<ShaderId, (ShaderStage, wgpu::ShaderModule)>,
    textures: HashMap<TextureId, TextureResource>,
    samplers: HashMap<SamplerId, wgpu::Sampler>,
}

impl Registry {
    fn allocate(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// GPU device and queue plus every resource created through them
pub struct WgpuDevice {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    registry: Mutex<Registry>,
}

impl std::fmt::Debug for WgpuDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        f.debug_struct("WgpuDevice")
            .field("buffers", &registry.buffers.len())
            .field("shaders", &registry.shaders.len())
            .field("textures", &registry.textures.len())
            .field("samplers", &registry.samplers.len())
            .finish()
    }
}

impl WgpuDevice {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            registry: Mutex::new(Registry::default()),
        }
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `create` inside a validation error scope
    fn scoped<T>(&self, create: impl FnOnce(&wgpu::Device) -> T) -> Result<T, String> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(&self.device);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(error.to_string()),
            None => Ok(value),
        }
    }

    pub fn buffer(&self, id: BufferId) -> Option<wgpu::Buffer> {
        self.registry().buffers.get(&id).cloned()
    }

    pub fn shader_module(&self, id: ShaderId) -> Option<wgpu::ShaderModule> {
        self.registry().shaders.get(&id).map(|(_, module)| module.clone())
    }

    pub fn texture_view(&self, id: TextureId) -> Option<wgpu::TextureView> {
        self.registry().textures.get(&id).map(|t| t.view.clone())
    }

    pub fn sampler(&self, id: SamplerId) -> Option<wgpu::Sampler> {
        self.registry().samplers.get(&id).cloned()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.registry().buffers.len()
    }

    /// Creates a sampler directly, without registering it
    pub(crate) fn raw_sampler(&self, label: &str, filter: SamplerFilter) -> wgpu::Sampler {
        let filter_mode = match filter {
            SamplerFilter::Nearest => wgpu::FilterMode::Nearest,
            SamplerFilter::Linear => wgpu::FilterMode::Linear,
        };
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: filter_mode,
            min_filter: filter_mode,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }
}

impl GraphicsDevice for WgpuDevice {
    fn create_buffer_init(
        &self,
        label: &str,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if contents.is_empty() {
            return Err(ResourceError::BufferCreation {
                label: label.to_string(),
                reason: "buffer contents are empty".to_string(),
            });
        }

        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };

        let buffer = self
            .scoped(|device| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage,
                })
            })
            .map_err(|reason| ResourceError::BufferCreation {
                label: label.to_string(),
                reason,
            })?;

        let mut registry = self.registry();
        let id = BufferId(registry.allocate());
        registry.buffers.insert(id, buffer);
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let buffer = self
            .registry()
            .buffers
            .remove(&id)
            .ok_or(ResourceError::UnknownBuffer(id))?;
        buffer.destroy();
        Ok(())
    }

    fn create_shader(&self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError> {
        let module = self
            .scoped(|device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(descriptor.label),
                    source: wgpu::ShaderSource::Wgsl(descriptor.source.into()),
                })
            })
            .map_err(|reason| ResourceError::ShaderCreation {
                label: descriptor.label.to_string(),
                reason,
            })?;

        let mut registry = self.registry();
        let id = ShaderId(registry.allocate());
        registry.shaders.insert(id, (descriptor.stage, module));
        Ok(id)
    }

    fn shader_stage(&self, id: ShaderId) -> Option<ShaderStage> {
        self.registry().shaders.get(&id).map(|(stage, _)| *stage)
    }

    fn create_texture_rgba8(
        &self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, ResourceError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(ResourceError::TextureCreation {
                label: label.to_string(),
                reason: format!(
                    "{}x{} texture needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    pixels.len()
                ),
            });
        }

        let texture = self
            .scoped(|device| {
                TextureResource::from_rgba8(
                    device,
                    &self.queue,
                    pixels,
                    width,
                    height,
                    label,
                    wgpu::TextureFormat::Rgba8UnormSrgb,
                )
            })
            .map_err(|reason| ResourceError::TextureCreation {
                label: label.to_string(),
                reason,
            })?;

        let mut registry = self.registry();
        let id = TextureId(registry.allocate());
        registry.textures.insert(id, texture);
        Ok(id)
    }

    fn create_sampler(&self, label: &str, filter: SamplerFilter) -> Result<SamplerId, ResourceError> {
        let sampler = self.raw_sampler(label, filter);
        let mut registry = self.registry();
        let id = SamplerId(registry.allocate());
        registry.samplers.insert(id, sampler);
        Ok(id)
    }
}
