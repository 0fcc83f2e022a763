//! # Graphics Module
//!
//! Scene composition and per-frame rendering.
//!
//! ## Architecture Overview
//!
//! - **Transforms** ([`transform`]) - Position, rotation and scale with a lazily cached world matrix
//! - **Camera** ([`camera`]) - First-person viewer with left-handed view and projection
//! - **Scene** ([`scene`]) - Meshes, entities, lights and the container that owns them
//! - **Resources** ([`resources`]) - Materials and the shader parameter blocks
//! - **Rendering** ([`rendering`]) - The frame protocol and its wgpu backend
//! - **Device surfaces** ([`device`]) - Traits separating scene objects from the GPU API
//!
//! Scene objects only see [`GraphicsDevice`](device::GraphicsDevice) and
//! [`RenderContext`](device::RenderContext). [`headless`] implements both
//! without a GPU.
//!
//! ## Usage
//!
//! ```no_run
//! use scenery::gfx::{camera::{Camera, CameraConfig}, headless::RecordingContext};
//! use scenery::gfx::rendering::FrameRenderer;
//! use scenery::gfx::scene::Scene;
//!
//! let mut scene = Scene::new(Camera::new(CameraConfig::default()));
//! let mut renderer = FrameRenderer::default();
//! let mut context = RecordingContext::new();
//! renderer.render_frame(&mut context, &mut scene).unwrap();
//! ```

pub mod assets;
pub mod camera;
pub mod device;
pub mod geometry;
pub mod headless;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::FrameRenderer;
pub use transform::Transform;
