//! Application event loop.
//!
//! [`App`] owns the window, the GPU context and the scene. The lifecycle is:
//!
//! 1. `resumed`: create the window and GPU context, then prepare the scene
//!    (textures, materials, meshes) exactly once
//! 2. window/device events feed the camera controller
//! 3. `RedrawRequested`: move the camera, run the scene's draw sequence and
//!    present the frame
//! 4. `exiting`: release the scene's textures

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    camera::apply_camera,
    config::SceneConfig,
    context::{Context, SurfaceErrorAction},
    render::SceneRenderer,
    scene::SceneManager,
};

/// Everything that only exists once the window is up.
pub struct AppState {
    pub(crate) ctx: Context,
    renderer: SceneRenderer,
    scene: SceneManager,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &SceneConfig) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window, config).await?;
        let size = ctx.window().inner_size();
        ctx.resize(size.width, size.height);

        let mut renderer = SceneRenderer::new(&ctx.device, &ctx.queue, ctx.config.format);
        let mut scene = SceneManager::new();
        scene.prepare_scene(&mut renderer, &config.assets_root)?;

        Ok(Self {
            ctx,
            renderer,
            scene,
        })
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window().request_redraw();

        // Rendering requires the surface to be configured
        if !self.ctx.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        apply_camera(&mut self.renderer, &self.ctx.camera, &self.ctx.projection);
        self.scene.render_scene(&mut self.renderer);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.renderer.render(
            &mut encoder,
            &view,
            self.ctx.depth_view(),
            self.ctx.clear_colour,
        );
        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: SceneConfig,
    state: Option<AppState>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let state = self
            .async_runtime
            .block_on(AppState::new(window, &self.config));
        match state {
            Ok(state) => {
                state.ctx.window().request_redraw();
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e.context("App initialization failed")),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.controller.process_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                state.ctx.controller.process_keyboard(key, key_state);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Right,
                ..
            } => state.ctx.controller.set_looking(button_state.is_pressed()),
            WindowEvent::MouseWheel { delta, .. } => state.ctx.controller.process_scroll(&delta),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                state.ctx.controller.update_camera(&mut state.ctx.camera, dt);

                match state.render() {
                    Ok(()) => {}
                    Err(e) => match state.ctx.handle_surface_error(e) {
                        SurfaceErrorAction::Reconfigured => log::debug!("Surface reconfigured"),
                        SurfaceErrorAction::SkipFrame => log::warn!("Skipping frame"),
                        SurfaceErrorAction::Fatal => {
                            log::error!("Out of GPU memory, shutting down");
                            event_loop.exit();
                        }
                    },
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.scene.destroy_textures(&mut state.renderer);
        }
    }
}

/// Open the window and run the scene until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
