// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

/// Typed uniform buffer holding one `Content` value
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let pos = type_name.rfind(':').unwrap_or(0);
    if pos > 0 {
        &type_name[(pos + 1)..]
    } else {
        type_name
    }
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a new uniform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Update buffer content (skips the write if nothing changed)
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    /// Get the underlying buffer
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Get buffer size
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}

/// CPU side of a [`DynamicUniformRing`]: blocks packed at aligned offsets.
#[derive(Debug, Clone)]
pub struct UniformStaging {
    alignment: u32,
    data: Vec<u8>,
}

impl UniformStaging {
    /// `alignment` must be a power of two (the device's
    /// `min_uniform_buffer_offset_alignment`).
    pub fn new(alignment: u32) -> Self {
        Self {
            alignment: alignment.max(1),
            data: Vec::new(),
        }
    }

    /// Appends a block and returns its dynamic offset. The block is zero-padded
    /// to `min_size` so the whole binding range is backed.
    pub fn push(&mut self, bytes: &[u8], min_size: usize) -> u32 {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        let block_end = offset + bytes.len().max(min_size);
        let aligned_end = align_to(block_end, self.alignment as usize);
        self.data.resize(aligned_end, 0);
        offset as u32
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

fn align_to(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// Uniform buffer that packs many small blocks per frame, addressed with
/// dynamic offsets. Grows when a frame needs more room.
pub struct DynamicUniformRing {
    label: String,
    buffer: wgpu::Buffer,
    staging: UniformStaging,
}

impl DynamicUniformRing {
    pub fn new(device: &wgpu::Device, label: &str, alignment: u32, capacity: u64) -> Self {
        Self {
            label: label.to_string(),
            buffer: Self::create_buffer(device, label, capacity.max(alignment as u64)),
            staging: UniformStaging::new(alignment),
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn push(&mut self, bytes: &[u8], min_size: usize) -> u32 {
        self.staging.push(bytes, min_size)
    }

    /// Uploads everything pushed since the last call and starts over.
    ///
    /// Returns true if the buffer had to be reallocated, in which case bind
    /// groups referencing it must be recreated.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        let needed = self.staging.len() as u64;
        let mut grown = false;
        if needed > self.buffer.size() {
            let size = needed.next_power_of_two();
            log::debug!("Growing '{}' to {} bytes", self.label, size);
            self.buffer = Self::create_buffer(device, &self.label, size);
            grown = true;
        }
        if !self.staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, self.staging.bytes());
        }
        self.staging.clear();
        grown
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_offsets_are_aligned() {
        let mut staging = UniformStaging::new(256);
        assert_eq!(staging.push(&[1; 208], 208), 0);
        assert_eq!(staging.push(&[2; 32], 32), 256);
        assert_eq!(staging.push(&[3; 300], 32), 512);
        assert_eq!(staging.len(), 1024);
        assert_eq!(staging.bytes()[256], 2);
        assert_eq!(staging.bytes()[256 + 32], 0);
    }

    #[test]
    fn test_short_blocks_are_padded_to_binding_size() {
        let mut staging = UniformStaging::new(4);
        staging.push(&[7; 2], 16);
        assert_eq!(staging.len(), 16);
        staging.clear();
        assert!(staging.is_empty());
    }
}
