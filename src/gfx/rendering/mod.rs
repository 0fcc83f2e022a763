// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The frame protocol ([`renderer`]) and the wgpu backend it drives: device
//! registry, window render context, pipeline cache and built-in shaders.

pub mod pipeline_cache;
pub mod renderer;
pub mod shaders;
pub mod wgpu_context;
pub mod wgpu_device;

// Re-export main types
pub use pipeline_cache::{PipelineCache, PipelineConfig};
pub use renderer::{DrawOrder, FramePhase, FrameRenderer, FrameStats, RendererConfig};
pub use shaders::basic_shader_pair;
pub use wgpu_context::{SurfaceConfig, WgpuRenderContext};
pub use wgpu_device::WgpuDevice;
