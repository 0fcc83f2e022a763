//! # Scene Module
//!
//! Everything a frame draws: [`Entity`] objects pairing a shared [`Mesh`] and
//! material with their own transform, the [`Light`]s, and the [`Scene`]
//! container that owns them together with the camera.
//!
//! ```no_run
//! use std::sync::Arc;
//! use scenery::gfx::camera::{Camera, CameraConfig};
//! use scenery::gfx::device::GraphicsDevice;
//! use scenery::gfx::geometry::cube;
//! use scenery::gfx::headless::HeadlessDevice;
//! use scenery::gfx::scene::{Mesh, Scene};
//!
//! let device: Arc<dyn GraphicsDevice> = Arc::new(HeadlessDevice::new());
//! let mut scene = Scene::new(Camera::new(CameraConfig::default()));
//! let mesh = scene.add_mesh(Mesh::from_geometry(device, "cube", &cube(1.0)).unwrap());
//! ```

pub mod entity;
pub mod light;
pub mod mesh;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use entity::{Entity, EntityId};
pub use light::{Light, LightCollection, LightKind, MAX_LIGHTS};
pub use mesh::Mesh;
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex;
