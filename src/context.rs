use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraController, Projection},
    config::SceneConfig,
    data_structures::texture,
};

/// What the application loop should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; the next frame may succeed.
    Reconfigured,
    SkipFrame,
    /// Out of memory; shut down.
    Fatal,
}

/// Window, surface and GPU handles plus the camera that looks at the scene.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: Camera,
    pub controller: CameraController,
    pub projection: Projection,
    pub clear_colour: wgpu::Color,
    pub is_surface_configured: bool,
}

impl Context {
    pub async fn new(window: Arc<Window>, scene_config: &SceneConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader writes linear colour; an sRGB surface does the conversion.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new(
            scene_config.camera_position,
            scene_config.camera_yaw,
            scene_config.camera_pitch,
        );
        let projection = Projection::new(config.width, config.height, scene_config.fovy, 0.1, 100.0);
        let controller =
            CameraController::new(scene_config.camera_speed, scene_config.mouse_sensitivity);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            controller,
            projection,
            clear_colour: scene_config.clear_color,
            is_surface_configured: false,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_texture.view
    }

    /// Reconfigure the surface and depth buffer. A zero-sized window (minimised)
    /// leaves the surface unconfigured until it gets a real size again.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.is_surface_configured = false;
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        self.is_surface_configured = true;
    }

    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                let size = self.window.inner_size();
                self.resize(size.width, size.height);
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

/// Pick an adapter (compatible with `surface` when given) and open a device.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> anyhow::Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .context("failed to find a suitable GPU adapter")?;
    log::info!("Using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("desk-scene device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")?;

    Ok((adapter, device, queue))
}
