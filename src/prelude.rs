//! # Scenery Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use scenery::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     App::new(AppConfig::default().with_title("Prelude"))?
//!         .with_setup(|device, scene| {
//!             let device: Arc<dyn GraphicsDevice> = device;
//!             let mesh = scene.add_mesh(Mesh::from_geometry(device.clone(), "cube", &cube(1.0))?);
//!             let shaders = basic_shader_pair(&*device)?;
//!             let material = scene.add_material(Material::new(
//!                 "white",
//!                 Vector4::new(1.0, 1.0, 1.0, 1.0),
//!                 32.0,
//!                 shaders,
//!             ));
//!             scene.spawn(Entity::new(mesh, material));
//!             scene.lights_mut().push(Light::ambient(Vector3::new(1.0, 1.0, 1.0), 0.2))?;
//!             Ok(())
//!         })
//!         .run()
//! }
//! ```

// Re-export core application types
pub use crate::app::{App, AppConfig};
pub use crate::error::{AppError, AssetError, RenderError, ResourceError, SceneError};
pub use crate::input::{InputSource, InputState};

// Re-export graphics and scene types
pub use crate::gfx::camera::{Camera, CameraBindings, CameraConfig};
pub use crate::gfx::device::{GraphicsDevice, RenderContext, ShaderStage};
pub use crate::gfx::geometry::{cube, house, quad, triangle, GeometryData};
pub use crate::gfx::rendering::{basic_shader_pair, DrawOrder, FrameRenderer, RendererConfig};
pub use crate::gfx::resources::{Material, ShaderPair};
pub use crate::gfx::scene::{Entity, Light, LightCollection, Mesh, Scene};
pub use crate::gfx::transform::Transform;

// Re-export gameplay controllers
pub use crate::gameplay::{PatrolConfig, PatrolController, PatrolState};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Vector3, Vector4, Zero};
pub use std::sync::Arc;
