//! Drawable scene objects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::gfx::camera::Camera;
use crate::gfx::device::{IndexFormat, ParameterBlock, RenderContext, ShaderStage};
use crate::gfx::resources::material::PipelineBinding;
use crate::gfx::resources::parameters::{PixelParameters, VertexParameters};
use crate::gfx::scene::mesh::Mesh;
use crate::gfx::scene::vertex::Vertex;
use crate::gfx::transform::Transform;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A mesh drawn with a material at a transform.
///
/// The entity owns its transform and shares the mesh and material, so both
/// outlive every entity that draws with them.
pub struct Entity {
    id: EntityId,
    name: Option<String>,
    transform: Transform,
    mesh: Arc<Mesh>,
    material: Arc<dyn PipelineBinding>,
}

impl Entity {
    pub fn new(mesh: Arc<Mesh>, material: Arc<dyn PipelineBinding>) -> Self {
        Self {
            id: EntityId::next(),
            name: None,
            transform: Transform::new(),
            mesh,
            material,
        }
    }

    /// Builder pattern: set a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder pattern: start from a given transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Issues this entity's draw against the bound targets.
    ///
    /// Binds the material, writes and flushes the per-draw parameter blocks,
    /// binds the mesh buffers, then draws every index once. The camera's
    /// matrices must be current for this frame.
    pub fn draw(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        self.material.bind(ctx);

        let surface = self.material.surface_parameters();
        let vertex = VertexParameters::new(
            self.transform.world_matrix(),
            camera.view_matrix(),
            camera.projection_matrix(),
            surface.color_tint,
        );
        let pixel = PixelParameters::new(surface.color_tint, surface.shininess);
        ctx.write_parameters(
            ShaderStage::Vertex,
            ParameterBlock::PerDraw,
            bytemuck::bytes_of(&vertex),
        );
        ctx.write_parameters(
            ShaderStage::Pixel,
            ParameterBlock::PerDraw,
            bytemuck::bytes_of(&pixel),
        );
        ctx.flush_parameters();

        ctx.set_vertex_buffer(self.mesh.vertex_buffer(), Vertex::STRIDE, 0);
        ctx.set_index_buffer(self.mesh.index_buffer(), IndexFormat::Uint32);
        ctx.draw_indexed(self.mesh.index_count(), 0, 0);
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn material(&self) -> &Arc<dyn PipelineBinding> {
        &self.material
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("mesh", &self.mesh.label())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraConfig;
    use crate::gfx::device::{GraphicsDevice, ShaderDescriptor};
    use crate::gfx::geometry::quad;
    use crate::gfx::headless::{HeadlessDevice, RecordedCall, RecordingContext};
    use crate::gfx::resources::material::{Material, ShaderPair};
    use cgmath::{Vector3, Vector4};

    fn quad_entity(device: &Arc<HeadlessDevice>) -> Entity {
        let shared: Arc<dyn GraphicsDevice> = device.clone();
        let mesh = Arc::new(Mesh::from_geometry(shared, "quad", &quad()).unwrap());
        let compile = |stage| {
            device
                .create_shader(&ShaderDescriptor {
                    label: "test",
                    stage,
                    source: "// program",
                })
                .unwrap()
        };
        let shaders = ShaderPair::new(
            &**device,
            compile(ShaderStage::Vertex),
            compile(ShaderStage::Pixel),
        )
        .unwrap();
        let material = Material::new("green", Vector4::new(0.0, 1.0, 0.0, 1.0), 8.0, shaders);
        Entity::new(mesh, Arc::new(material))
    }

    #[test]
    fn test_ids_are_unique() {
        let device = Arc::new(HeadlessDevice::new());
        let a = quad_entity(&device);
        let b = quad_entity(&device);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_draw_follows_binding_order() {
        let device = Arc::new(HeadlessDevice::new());
        let mut entity = quad_entity(&device);
        let camera = Camera::new(CameraConfig::default());
        let mut ctx = RecordingContext::new();

        entity.draw(&mut ctx, &camera);

        let calls = ctx.calls();
        assert_eq!(calls.len(), 8);
        assert!(matches!(calls[0], RecordedCall::SetShaders { .. }));
        assert!(matches!(calls[1], RecordedCall::SetTextures(_)));
        assert!(matches!(
            calls[2],
            RecordedCall::WriteParameters {
                stage: ShaderStage::Vertex,
                block: ParameterBlock::PerDraw,
                ..
            }
        ));
        assert!(matches!(
            calls[3],
            RecordedCall::WriteParameters {
                stage: ShaderStage::Pixel,
                block: ParameterBlock::PerDraw,
                ..
            }
        ));
        assert_eq!(calls[4], RecordedCall::FlushParameters);
        assert_eq!(
            calls[5],
            RecordedCall::SetVertexBuffer {
                buffer: entity.mesh().vertex_buffer(),
                stride: std::mem::size_of::<Vertex>() as u32,
                offset: 0,
            }
        );
        assert_eq!(
            calls[6],
            RecordedCall::SetIndexBuffer {
                buffer: entity.mesh().index_buffer(),
                format: IndexFormat::Uint32,
            }
        );
        assert_eq!(ctx.draw_calls(), vec![(6, 0, 0)]);
    }

    #[test]
    fn test_draw_uploads_current_world_matrix() {
        let device = Arc::new(HeadlessDevice::new());
        let mut entity = quad_entity(&device);
        let camera = Camera::new(CameraConfig::default());
        let mut ctx = RecordingContext::new();

        entity.transform_mut().set_position(Vector3::new(3.0, 0.0, 0.0));
        entity.draw(&mut ctx, &camera);

        let writes = ctx.parameter_writes(ShaderStage::Vertex, ParameterBlock::PerDraw);
        let uploaded: VertexParameters = bytemuck::pod_read_unaligned(writes[0]);
        assert_eq!(uploaded.world[3], [3.0, 0.0, 0.0, 1.0]);
        assert_eq!(uploaded.color_tint, [0.0, 1.0, 0.0, 1.0]);
        assert!(!entity.transform().is_dirty());

        let pixel_writes = ctx.parameter_writes(ShaderStage::Pixel, ParameterBlock::PerDraw);
        let pixel: PixelParameters = bytemuck::pod_read_unaligned(pixel_writes[0]);
        assert_eq!(pixel.shininess, 8.0);
    }
}
