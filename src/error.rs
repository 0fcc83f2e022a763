//! Error types shared across the engine.
//!
//! Resource creation is fatal at initialization time: every constructor that
//! touches the GPU returns a [`ResourceError`] instead of handing back a
//! partially built object. Frame-level failures surface as [`RenderError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::device::{BufferId, ShaderId, ShaderStage, TextureId};
use crate::gfx::rendering::renderer::FramePhase;

/// Failure to create, look up or release a GPU resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to create buffer '{label}': {reason}")]
    BufferCreation { label: String, reason: String },

    #[error("failed to create shader program '{label}': {reason}")]
    ShaderCreation { label: String, reason: String },

    #[error("failed to create texture '{label}': {reason}")]
    TextureCreation { label: String, reason: String },

    #[error("geometry '{label}' is invalid: {reason}")]
    InvalidGeometry { label: String, reason: String },

    #[error("shader {id:?} is a {found:?} program, expected {expected:?}")]
    StageMismatch {
        id: ShaderId,
        expected: ShaderStage,
        found: ShaderStage,
    },

    #[error("unknown buffer {0:?}")]
    UnknownBuffer(BufferId),

    #[error("unknown shader {0:?}")]
    UnknownShader(ShaderId),

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
}

/// Failure while loading an asset from disk.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load model '{path}': {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model '{path}' contains no geometry")]
    EmptyModel { path: PathBuf },

    #[error("failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Failure while running the per-frame protocol.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("frame step called out of order: expected {expected:?}, frame is in {found:?}")]
    OutOfOrder {
        expected: FramePhase,
        found: FramePhase,
    },

    #[error("render targets are not bound; rebind_targets must follow every present")]
    TargetsUnbound,

    #[error("surface error: {0}")]
    Surface(String),

    #[error("graphics backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Failure while composing a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("light collection is full (capacity {capacity})")]
    LightCapacity { capacity: usize },
}

/// Failure while running the windowed application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
