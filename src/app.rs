//! Windowed application driving the frame loop.
//!
//! [`App`] owns the winit event loop, the wgpu render context and the scene.
//! Scene contents are built by a setup callback once the device exists; an
//! optional update callback runs gameplay every frame before rendering.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::error::{AppError, RenderError};
use crate::gfx::{
    camera::{Camera, CameraConfig},
    rendering::{FrameRenderer, RendererConfig, SurfaceConfig, WgpuDevice, WgpuRenderContext},
    scene::Scene,
};
use crate::input::InputState;

/// Builds the scene once the GPU device is available
pub type SetupCallback = Box<dyn FnOnce(Arc<WgpuDevice>, &mut Scene) -> Result<(), AppError>>;

/// Runs every frame with the elapsed seconds since the previous frame
pub type UpdateCallback = Box<dyn FnMut(&mut Scene, &InputState, f32)>;

/// Window and renderer settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "scenery".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            camera: CameraConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = renderer;
        self
    }
}

pub struct App {
    event_loop: EventLoop<()>,
    state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    context: Option<WgpuRenderContext>,
    renderer: FrameRenderer,
    scene: Scene,
    input: InputState,
    setup: Option<SetupCallback>,
    update: Option<UpdateCallback>,
    last_frame: Instant,
    error: Option<AppError>,
}

impl App {
    /// Creates the event loop and an empty scene
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::new()?;
        let scene = Scene::new(Camera::new(config.camera.clone()));
        let renderer = FrameRenderer::new(config.renderer.clone());

        Ok(Self {
            event_loop,
            state: AppState {
                config,
                window: None,
                context: None,
                renderer,
                scene,
                input: InputState::new(),
                setup: None,
                update: None,
                last_frame: Instant::now(),
                error: None,
            },
        })
    }

    /// Sets the scene setup callback
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(Arc<WgpuDevice>, &mut Scene) -> Result<(), AppError> + 'static,
    {
        self.state.setup = Some(Box::new(setup));
        self
    }

    /// Sets the per-frame update callback
    pub fn with_update<F>(mut self, update: F) -> Self
    where
        F: FnMut(&mut Scene, &InputState, f32) + 'static,
    {
        self.state.update = Some(Box::new(update));
        self
    }

    /// Runs until the window closes or Escape is pressed
    pub fn run(self) -> Result<(), AppError> {
        let Self {
            event_loop,
            mut state,
        } = self;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut state)?;

        let stats = state.scene.statistics();
        log::info!(
            "Shutting down after {} frames ({} entities)",
            state.renderer.frame_index(),
            stats.entity_count
        );

        match state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let surface = SurfaceConfig {
            width,
            height,
            vsync: self.config.vsync,
        };
        let context = pollster::block_on(WgpuRenderContext::new(window, surface))?;
        self.scene.resize(width, height);

        if let Some(setup) = self.setup.take() {
            setup(context.device(), &mut self.scene)?;
        }
        let stats = self.scene.statistics();
        log::info!(
            "Scene ready: {} entities, {} meshes, {} lights",
            stats.entity_count,
            stats.mesh_count,
            stats.light_count
        );

        self.context = Some(context);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(context) = self.context.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.scene.camera_mut().update(dt, &self.input);
        if let Some(update) = self.update.as_mut() {
            update(&mut self.scene, &self.input, dt);
        }

        match self.renderer.render_frame(context, &mut self.scene) {
            Ok(stats) => log::trace!(
                "Frame {}: {} draws, {} indices",
                stats.frame_index,
                stats.draw_calls,
                stats.indices_submitted
            ),
            Err(RenderError::Surface(reason)) => {
                log::error!("Surface error, skipping frame: {}", reason)
            }
            Err(e) => log::warn!("Frame skipped: {}", e),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::debug!("Resized to {}x{}", width, height);
                self.scene.resize(width, height);
                if let Some(context) = self.context.as_mut() {
                    if let Err(e) = context.resize(width, height) {
                        log::error!("Failed to resize surface: {}", e);
                    }
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
