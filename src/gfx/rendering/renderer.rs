//! Per-frame protocol
//!
//! [`FrameRenderer`] drives a [`RenderContext`] through one frame:
//!
//! 1. clear the color, depth and stencil targets
//! 2. upload the shared per-frame data (lights, camera position)
//! 3. draw each entity
//! 4. present
//! 5. rebind the targets for the next frame
//!
//! Steps can be driven one by one or all at once with
//! [`FrameRenderer::render_frame`]. Calling a step out of order returns
//! [`RenderError::OutOfOrder`] and leaves the frame untouched.

use cgmath::Vector3;

use crate::error::RenderError;
use crate::gfx::camera::Camera;
use crate::gfx::device::{ParameterBlock, RenderContext, ShaderStage};
use crate::gfx::resources::parameters::FrameParameters;
use crate::gfx::scene::{Entity, LightCollection, Scene};

/// Where the current frame is in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Targets bound, nothing recorded yet.
    Idle,
    Cleared,
    SharedUploaded,
    Drawing,
    /// Presented; targets must be rebound before the next frame.
    Presented,
}

/// Order in which [`FrameRenderer::render_frame`] draws a scene's entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    /// Scene order.
    #[default]
    Submission,
    /// Farthest from the camera first.
    BackToFront,
}

/// Frame renderer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    pub clear_color: [f32; 4],
    pub clear_depth: f32,
    pub clear_stencil: u32,
    pub draw_order: DrawOrder,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.4, 0.6, 0.75, 0.0],
            clear_depth: 1.0,
            clear_stencil: 0,
            draw_order: DrawOrder::Submission,
        }
    }
}

impl RendererConfig {
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_clear_depth_stencil(mut self, depth: f32, stencil: u32) -> Self {
        self.clear_depth = depth;
        self.clear_stencil = stencil;
        self
    }

    pub fn with_draw_order(mut self, order: DrawOrder) -> Self {
        self.draw_order = order;
        self
    }
}

/// What one frame submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame_index: u64,
    pub draw_calls: u32,
    pub indices_submitted: u64,
}

#[derive(Debug)]
pub struct FrameRenderer {
    config: RendererConfig,
    phase: FramePhase,
    frame_index: u64,
    stats: FrameStats,
}

impl FrameRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            phase: FramePhase::Idle,
            frame_index: 0,
            stats: FrameStats::default(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RendererConfig) {
        self.config = config;
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of frames completed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Starts a frame by clearing every target to the configured values.
    pub fn clear(&mut self, ctx: &mut dyn RenderContext) -> Result<(), RenderError> {
        self.expect(&[FramePhase::Idle], FramePhase::Idle)?;

        ctx.clear(
            self.config.clear_color,
            self.config.clear_depth,
            self.config.clear_stencil,
        );
        self.stats = FrameStats {
            frame_index: self.frame_index,
            ..FrameStats::default()
        };
        self.phase = FramePhase::Cleared;
        Ok(())
    }

    /// Uploads the lights and the camera position every draw of this frame reads.
    pub fn update_shared(
        &mut self,
        ctx: &mut dyn RenderContext,
        lights: &LightCollection,
        camera_position: Vector3<f32>,
    ) -> Result<(), RenderError> {
        self.expect(&[FramePhase::Cleared], FramePhase::Cleared)?;

        let frame = FrameParameters::new(lights, camera_position);
        ctx.write_parameters(
            ShaderStage::Pixel,
            ParameterBlock::PerFrame,
            bytemuck::bytes_of(&frame),
        );
        ctx.flush_parameters();

        self.phase = FramePhase::SharedUploaded;
        Ok(())
    }

    pub fn draw_entity(
        &mut self,
        ctx: &mut dyn RenderContext,
        entity: &mut Entity,
        camera: &Camera,
    ) -> Result<(), RenderError> {
        self.expect(
            &[FramePhase::SharedUploaded, FramePhase::Drawing],
            FramePhase::SharedUploaded,
        )?;

        entity.draw(ctx, camera);
        self.stats.draw_calls += 1;
        self.stats.indices_submitted += entity.mesh().index_count() as u64;
        self.phase = FramePhase::Drawing;
        Ok(())
    }

    /// Presents the frame. [`rebind_targets`](Self::rebind_targets) must follow,
    /// even when presenting fails.
    pub fn present(&mut self, ctx: &mut dyn RenderContext) -> Result<(), RenderError> {
        self.expect(
            &[FramePhase::SharedUploaded, FramePhase::Drawing],
            FramePhase::Drawing,
        )?;

        self.phase = FramePhase::Presented;
        ctx.present()
    }

    /// Rebinds the targets after presenting and closes the frame.
    pub fn rebind_targets(&mut self, ctx: &mut dyn RenderContext) -> Result<FrameStats, RenderError> {
        self.expect(&[FramePhase::Presented], FramePhase::Presented)?;

        ctx.rebind_targets()?;
        self.phase = FramePhase::Idle;
        self.frame_index += 1;
        log::trace!(
            "Frame {} done: {} draws, {} indices",
            self.stats.frame_index,
            self.stats.draw_calls,
            self.stats.indices_submitted
        );
        Ok(self.stats)
    }

    /// Runs a complete frame over `scene`.
    ///
    /// The camera must already be updated for this frame.
    pub fn render_frame(
        &mut self,
        ctx: &mut dyn RenderContext,
        scene: &mut Scene,
    ) -> Result<FrameStats, RenderError> {
        // Retry a rebind that failed at the end of the previous frame
        if self.phase == FramePhase::Presented {
            self.rebind_targets(ctx)?;
        }

        let (camera, lights, entities) = scene.frame_parts();

        self.clear(ctx)?;
        self.update_shared(ctx, lights, camera.position())?;

        match self.config.draw_order {
            DrawOrder::Submission => {
                for entity in entities.iter_mut() {
                    self.draw_entity(ctx, entity, camera)?;
                }
            }
            DrawOrder::BackToFront => {
                let eye = camera.position();
                let mut order: Vec<(usize, f32)> = entities
                    .iter()
                    .enumerate()
                    .map(|(i, e)| (i, e.transform().distance_squared_to(eye)))
                    .collect();
                order.sort_by(|a, b| b.1.total_cmp(&a.1));
                for (index, _) in order {
                    self.draw_entity(ctx, &mut entities[index], camera)?;
                }
            }
        }

        let presented = self.present(ctx);
        let stats = self.rebind_targets(ctx)?;
        presented?;
        Ok(stats)
    }

    fn expect(&self, allowed: &[FramePhase], expected: FramePhase) -> Result<(), RenderError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(RenderError::OutOfOrder {
                expected,
                found: self.phase,
            })
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cgmath::Vector4;

    use crate::gfx::camera::CameraConfig;
    use crate::gfx::device::{GraphicsDevice, ShaderDescriptor};
    use crate::gfx::geometry::{quad, triangle};
    use crate::gfx::headless::{HeadlessDevice, RecordedCall, RecordingContext};
    use crate::gfx::resources::material::{Material, ShaderPair};
    use crate::gfx::scene::{Light, Mesh};

    fn test_scene() -> (Arc<HeadlessDevice>, Scene) {
        let device = Arc::new(HeadlessDevice::new());
        let shared: Arc<dyn GraphicsDevice> = device.clone();
        let mut scene = Scene::new(Camera::new(
            CameraConfig::default().with_position(Vector3::new(0.0, 0.0, -5.0)),
        ));

        let vs = device
            .create_shader(&ShaderDescriptor {
                label: "vs",
                stage: ShaderStage::Vertex,
                source: "// vertex",
            })
            .unwrap();
        let ps = device
            .create_shader(&ShaderDescriptor {
                label: "ps",
                stage: ShaderStage::Pixel,
                source: "// pixel",
            })
            .unwrap();
        let material = scene.add_material(Material::new(
            "white",
            Vector4::new(1.0, 1.0, 1.0, 1.0),
            16.0,
            ShaderPair::new(&*device, vs, ps).unwrap(),
        ));

        let tri = scene.add_mesh(Mesh::from_geometry(shared.clone(), "tri", &triangle()).unwrap());
        let quad = scene.add_mesh(Mesh::from_geometry(shared, "quad", &quad()).unwrap());

        let mut near = Entity::new(tri, material.clone()).with_name("near");
        near.transform_mut().set_position(Vector3::new(0.0, 0.0, -2.0));
        let mut far = Entity::new(quad, material).with_name("far");
        far.transform_mut().set_position(Vector3::new(0.0, 0.0, 10.0));
        scene.spawn(near);
        scene.spawn(far);

        scene
            .lights_mut()
            .push(Light::ambient(Vector3::new(0.1, 0.1, 0.1), 1.0))
            .unwrap();
        (device, scene)
    }

    #[test]
    fn test_clear_uses_configured_defaults() {
        let mut renderer = FrameRenderer::default();
        let mut ctx = RecordingContext::new();

        renderer.clear(&mut ctx).unwrap();

        assert_eq!(
            ctx.calls(),
            &[RecordedCall::Clear {
                color: [0.4, 0.6, 0.75, 0.0],
                depth: 1.0,
                stencil: 0,
            }]
        );
        assert_eq!(renderer.phase(), FramePhase::Cleared);
    }

    #[test]
    fn test_out_of_order_steps_are_rejected() {
        let (_device, mut scene) = test_scene();
        let mut renderer = FrameRenderer::default();
        let mut ctx = RecordingContext::new();

        assert!(matches!(
            renderer.present(&mut ctx),
            Err(RenderError::OutOfOrder {
                found: FramePhase::Idle,
                ..
            })
        ));

        renderer.clear(&mut ctx).unwrap();
        let (camera, _, entities) = scene.frame_parts();
        assert!(matches!(
            renderer.draw_entity(&mut ctx, &mut entities[0], camera),
            Err(RenderError::OutOfOrder {
                expected: FramePhase::SharedUploaded,
                found: FramePhase::Cleared,
            })
        ));
        assert!(renderer.clear(&mut ctx).is_err());
        assert_eq!(renderer.phase(), FramePhase::Cleared);
        assert_eq!(ctx.draw_calls().len(), 0);
    }

    #[test]
    fn test_frame_sequence() {
        let (_device, mut scene) = test_scene();
        let mut renderer = FrameRenderer::default();
        let mut ctx = RecordingContext::new();

        let stats = renderer.render_frame(&mut ctx, &mut scene).unwrap();

        assert_eq!(
            stats,
            FrameStats {
                frame_index: 0,
                draw_calls: 2,
                indices_submitted: 9,
            }
        );
        let calls = ctx.calls();
        assert!(matches!(calls[0], RecordedCall::Clear { .. }));
        assert!(matches!(
            calls[1],
            RecordedCall::WriteParameters {
                stage: ShaderStage::Pixel,
                block: ParameterBlock::PerFrame,
                ..
            }
        ));
        assert_eq!(calls[2], RecordedCall::FlushParameters);
        assert_eq!(
            &calls[calls.len() - 2..],
            &[RecordedCall::Present, RecordedCall::RebindTargets]
        );
        // The shared block is written once per frame, before any draw.
        assert_eq!(
            ctx.parameter_writes(ShaderStage::Pixel, ParameterBlock::PerFrame)
                .len(),
            1
        );
        assert_eq!(ctx.draw_calls(), vec![(3, 0, 0), (6, 0, 0)]);
        assert_eq!(renderer.phase(), FramePhase::Idle);

        let second = renderer.render_frame(&mut ctx, &mut scene).unwrap();
        assert_eq!(second.frame_index, 1);
        assert_eq!(ctx.frames_presented(), 2);
    }

    #[test]
    fn test_missed_rebind_is_retried_by_next_frame() {
        let (_device, mut scene) = test_scene();
        let mut renderer = FrameRenderer::default();
        let mut ctx = RecordingContext::new();

        renderer.clear(&mut ctx).unwrap();
        let camera_position = scene.camera().position();
        renderer
            .update_shared(&mut ctx, scene.lights(), camera_position)
            .unwrap();
        renderer.present(&mut ctx).unwrap();
        assert!(!ctx.targets_bound());

        let stats = renderer.render_frame(&mut ctx, &mut scene).unwrap();
        assert_eq!(stats.frame_index, 1);
        assert_eq!(ctx.frames_presented(), 2);
        assert!(ctx.targets_bound());
    }

    #[test]
    fn test_back_to_front_draws_farthest_first() {
        let (_device, mut scene) = test_scene();
        let mut renderer =
            FrameRenderer::new(RendererConfig::default().with_draw_order(DrawOrder::BackToFront));
        let mut ctx = RecordingContext::new();

        renderer.render_frame(&mut ctx, &mut scene).unwrap();

        // The quad (6 indices) is 15 units away, the triangle 3.
        assert_eq!(ctx.draw_calls(), vec![(6, 0, 0), (3, 0, 0)]);
    }

    #[test]
    fn test_shared_upload_carries_lights_and_camera() {
        let (_device, mut scene) = test_scene();
        let mut renderer = FrameRenderer::default();
        let mut ctx = RecordingContext::new();

        renderer.render_frame(&mut ctx, &mut scene).unwrap();

        let writes = ctx.parameter_writes(ShaderStage::Pixel, ParameterBlock::PerFrame);
        let frame: FrameParameters = bytemuck::pod_read_unaligned(writes[0]);
        assert_eq!(frame.light_count, 1);
        assert_eq!(frame.camera_position, [0.0, 0.0, -5.0]);
    }
}
