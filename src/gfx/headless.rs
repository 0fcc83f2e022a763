//! # Headless Backend
//!
//! A [`GraphicsDevice`] and [`RenderContext`] pair that never touches a GPU.
//! [`HeadlessDevice`] hands out ids and tracks which buffers are alive;
//! [`RecordingContext`] records every binding, upload and draw as a
//! [`RecordedCall`] so the frame protocol can be inspected after the fact.
//!
//! Used by the unit and integration tests, and usable by tooling that wants to
//! drive a scene without a window.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{RenderError, ResourceError};
use crate::gfx::device::{
    BufferId, BufferUsage, GraphicsDevice, IndexFormat, ParameterBlock, RenderContext,
    SamplerFilter, SamplerId, ShaderDescriptor, ShaderId, ShaderStage, TextureId, TextureSet,
};

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: usize,
    live_buffers: HashMap<BufferId, (BufferUsage, usize)>,
    destroyed_buffers: Vec<BufferId>,
    rejected_destroys: usize,
    shaders: HashMap<ShaderId, ShaderStage>,
    textures: HashSet<TextureId>,
    failing_buffers: HashMap<BufferUsage, usize>,
}

impl HeadlessState {
    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory device that tracks resource lifetimes.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: Mutex<HeadlessState>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` creations of `usage` buffers fail.
    pub fn fail_buffer_creations(&self, usage: BufferUsage, count: usize) {
        self.lock().failing_buffers.insert(usage, count);
    }

    pub fn live_buffer_count(&self) -> usize {
        self.lock().live_buffers.len()
    }

    pub fn is_buffer_live(&self, id: BufferId) -> bool {
        self.lock().live_buffers.contains_key(&id)
    }

    /// Size in bytes of a live buffer.
    pub fn buffer_size(&self, id: BufferId) -> Option<usize> {
        self.lock().live_buffers.get(&id).map(|(_, size)| *size)
    }

    /// Every buffer released so far, in release order.
    pub fn destroyed_buffers(&self) -> Vec<BufferId> {
        self.lock().destroyed_buffers.clone()
    }

    /// Number of release requests for unknown or already released buffers.
    pub fn rejected_destroy_count(&self) -> usize {
        self.lock().rejected_destroys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HeadlessState> {
        // A panicking test thread must not hide the counters from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer_init(
        &self,
        label: &str,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let mut state = self.lock();
        if let Some(remaining) = state.failing_buffers.get_mut(&usage).filter(|n| **n > 0) {
            *remaining -= 1;
            return Err(ResourceError::BufferCreation {
                label: label.to_string(),
                reason: "simulated allocation failure".to_string(),
            });
        }
        let id = BufferId(state.next_id());
        state.live_buffers.insert(id, (usage, contents.len()));
        log::trace!("headless: created {:?} buffer '{}' as {:?}", usage, label, id);
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut state = self.lock();
        if state.live_buffers.remove(&id).is_none() {
            state.rejected_destroys += 1;
            return Err(ResourceError::UnknownBuffer(id));
        }
        state.destroyed_buffers.push(id);
        Ok(())
    }

    fn create_shader(&self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError> {
        if descriptor.source.trim().is_empty() {
            return Err(ResourceError::ShaderCreation {
                label: descriptor.label.to_string(),
                reason: "empty source".to_string(),
            });
        }
        let mut state = self.lock();
        let id = ShaderId(state.next_id());
        state.shaders.insert(id, descriptor.stage);
        Ok(id)
    }

    fn shader_stage(&self, id: ShaderId) -> Option<ShaderStage> {
        self.lock().shaders.get(&id).copied()
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
        let mut state = self.lock();
        let id = TextureId(state.next_id());
        state.textures.insert(id);
        Ok(id)
    }

    fn create_sampler(&self, _label: &str, _filter: SamplerFilter) -> Result<SamplerId, ResourceError> {
        Ok(SamplerId(self.lock().next_id()))
    }
}

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Clear {
        color: [f32; 4],
        depth: f32,
        stencil: u32,
    },
    SetShaders {
        vertex: ShaderId,
        pixel: ShaderId,
    },
    SetTextures(TextureSet),
    WriteParameters {
        stage: ShaderStage,
        block: ParameterBlock,
        data: Vec<u8>,
    },
    FlushParameters,
    SetVertexBuffer {
        buffer: BufferId,
        stride: u32,
        offset: u64,
    },
    SetIndexBuffer {
        buffer: BufferId,
        format: IndexFormat,
    },
    DrawIndexed {
        index_count: u32,
        first_index: u32,
        base_vertex: i32,
    },
    Present,
    RebindTargets,
}

/// Render context that records calls instead of executing them.
///
/// Presenting unbinds the targets just like a real swapchain; presenting again
/// before [`rebind_targets`](RenderContext::rebind_targets) fails with
/// [`RenderError::TargetsUnbound`].
#[derive(Debug, Clone)]
pub struct RecordingContext {
    calls: Vec<RecordedCall>,
    targets_bound: bool,
    frames_presented: u64,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            targets_bound: true,
            frames_presented: 0,
        }
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn targets_bound(&self) -> bool {
        self.targets_bound
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// `(index_count, first_index, base_vertex)` of every indexed draw.
    pub fn draw_calls(&self) -> Vec<(u32, u32, i32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::DrawIndexed {
                    index_count,
                    first_index,
                    base_vertex,
                } => Some((*index_count, *first_index, *base_vertex)),
                _ => None,
            })
            .collect()
    }

    /// Payloads of every parameter write to `stage`/`block`, in call order.
    pub fn parameter_writes(&self, stage: ShaderStage, block: ParameterBlock) -> Vec<&[u8]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::WriteParameters {
                    stage: s,
                    block: b,
                    data,
                } if *s == stage && *b == block => Some(data.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl RenderContext for RecordingContext {
    fn clear(&mut self, color: [f32; 4], depth: f32, stencil: u32) {
        self.calls.push(RecordedCall::Clear {
            color,
            depth,
            stencil,
        });
    }

    fn set_shaders(&mut self, vertex: ShaderId, pixel: ShaderId) {
        self.calls.push(RecordedCall::SetShaders { vertex, pixel });
    }

    fn set_textures(&mut self, textures: TextureSet) {
        self.calls.push(RecordedCall::SetTextures(textures));
    }

    fn write_parameters(&mut self, stage: ShaderStage, block: ParameterBlock, data: &[u8]) {
        self.calls.push(RecordedCall::WriteParameters {
            stage,
            block,
            data: data.to_vec(),
        });
    }

    fn flush_parameters(&mut self) {
        self.calls.push(RecordedCall::FlushParameters);
    }

    fn set_vertex_buffer(&mut self, buffer: BufferId, stride: u32, offset: u64) {
        self.calls.push(RecordedCall::SetVertexBuffer {
            buffer,
            stride,
            offset,
        });
    }

    fn set_index_buffer(&mut self, buffer: BufferId, format: IndexFormat) {
        self.calls
            .push(RecordedCall::SetIndexBuffer { buffer, format });
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, base_vertex: i32) {
        self.calls.push(RecordedCall::DrawIndexed {
            index_count,
            first_index,
            base_vertex,
        });
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if !self.targets_bound {
            return Err(RenderError::TargetsUnbound);
        }
        self.calls.push(RecordedCall::Present);
        self.targets_bound = false;
        self.frames_presented += 1;
        Ok(())
    }

    fn rebind_targets(&mut self) -> Result<(), RenderError> {
        self.calls.push(RecordedCall::RebindTargets);
        self.targets_bound = true;
        Ok(())
    }
}
