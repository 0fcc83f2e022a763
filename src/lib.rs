// src/lib.rs
//! Scenery
//!
//! Scene composition and per-frame rendering built on wgpu and winit.
//!
//! Entities pair a shared mesh and material with their own transform; a
//! first-person camera supplies the view and projection; the
//! [`FrameRenderer`](gfx::rendering::FrameRenderer) drives each frame through
//! clear, shared upload, per-entity draws, present and target rebind.

pub mod app;
pub mod error;
pub mod gameplay;
pub mod gfx;
pub mod input;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{App, AppConfig};
pub use error::{AppError, AssetError, RenderError, ResourceError, SceneError};
