//! GPU-resident geometry.
//!
//! A [`Mesh`] owns one immutable vertex buffer and one immutable index buffer.
//! It is move-only; entities share a mesh through `Arc<Mesh>`, and the buffers
//! are released when the last reference goes away.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AssetError, ResourceError};
use crate::gfx::assets;
use crate::gfx::device::{BufferId, BufferUsage, GraphicsDevice};
use crate::gfx::geometry::GeometryData;
use crate::gfx::scene::vertex::Vertex;

pub struct Mesh {
    device: Arc<dyn GraphicsDevice>,
    label: String,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    /// Uploads `vertices` and `indices` into buffers sized exactly to them.
    ///
    /// Fails on empty geometry, on indices that reference a missing vertex and
    /// on buffer creation errors. Nothing stays allocated on failure.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        label: &str,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, ResourceError> {
        validate(label, vertices, indices)?;

        let vertex_buffer = device.create_buffer_init(
            &format!("{label} vertices"),
            BufferUsage::Vertex,
            bytemuck::cast_slice(vertices),
        )?;
        let index_buffer = match device.create_buffer_init(
            &format!("{label} indices"),
            BufferUsage::Index,
            bytemuck::cast_slice(indices),
        ) {
            Ok(buffer) => buffer,
            Err(err) => {
                if let Err(release) = device.destroy_buffer(vertex_buffer) {
                    log::warn!("Failed to release vertex buffer of '{}': {}", label, release);
                }
                return Err(err);
            }
        };

        log::debug!(
            "Created mesh '{}' ({} vertices, {} indices)",
            label,
            vertices.len(),
            indices.len()
        );

        Ok(Self {
            device,
            label: label.to_string(),
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
        })
    }

    pub fn from_geometry(
        device: Arc<dyn GraphicsDevice>,
        label: &str,
        geometry: &GeometryData,
    ) -> Result<Self, ResourceError> {
        Self::new(device, label, &geometry.to_vertices(), &geometry.indices)
    }

    /// Loads every model in an OBJ file as one mesh.
    pub fn from_obj(device: Arc<dyn GraphicsDevice>, path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let geometry = assets::load_obj(path)?;
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_geometry(device, &label, &geometry)?)
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> BufferId {
        self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

fn validate(label: &str, vertices: &[Vertex], indices: &[u32]) -> Result<(), ResourceError> {
    let invalid = |reason: String| ResourceError::InvalidGeometry {
        label: label.to_string(),
        reason,
    };

    if vertices.is_empty() {
        return Err(invalid("no vertices".to_string()));
    }
    if indices.is_empty() {
        return Err(invalid("no indices".to_string()));
    }
    if vertices.len() > u32::MAX as usize || indices.len() > u32::MAX as usize {
        return Err(invalid("too many elements for 32-bit indexing".to_string()));
    }
    if let Some(index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(invalid(format!(
            "index {} out of range for {} vertices",
            index,
            vertices.len()
        )));
    }
    Ok(())
}

impl Drop for Mesh {
    fn drop(&mut self) {
        for buffer in [self.vertex_buffer, self.index_buffer] {
            if let Err(err) = self.device.destroy_buffer(buffer) {
                log::warn!("Failed to release buffer of mesh '{}': {}", self.label, err);
            }
        }
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("label", &self.label)
            .field("vertex_buffer", &self.vertex_buffer)
            .field("index_buffer", &self.index_buffer)
            .field("vertex_count", &self.vertex_count)
            .field("index_count", &self.index_count)
            .finish()
    }
}
