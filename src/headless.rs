//! Offscreen rendering for image tests.
//!
//! Renders one frame of the scene into a texture without a window and reads
//! it back as an [`image::RgbaImage`].

use instant::Duration;

use anyhow::Context as _;

use crate::{
    camera::{Camera, Projection, apply_camera},
    config::SceneConfig,
    context::request_device,
    data_structures::texture::Texture,
    render::SceneRenderer,
    scene::SceneManager,
};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct HeadlessScene {
    device: wgpu::Device,
    queue: wgpu::Queue,
    renderer: SceneRenderer,
    scene: SceneManager,
    camera: Camera,
    projection: Projection,
    clear_colour: wgpu::Color,
    width: u32,
    height: u32,
}

impl HeadlessScene {
    pub async fn new(config: &SceneConfig) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let (_adapter, device, queue) = request_device(&instance, None).await?;

        let mut renderer = SceneRenderer::new(&device, &queue, COLOR_FORMAT);
        let mut scene = SceneManager::new();
        scene.prepare_scene(&mut renderer, &config.assets_root)?;

        Ok(Self {
            device,
            queue,
            renderer,
            scene,
            camera: Camera::new(config.camera_position, config.camera_yaw, config.camera_pitch),
            projection: Projection::new(config.width, config.height, config.fovy, 0.1, 100.0),
            clear_colour: config.clear_color,
            width: config.width.max(1),
            height: config.height.max(1),
        })
    }

    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    /// Draw one frame and copy it back to the CPU.
    pub async fn render_to_image(&mut self) -> anyhow::Result<image::RgbaImage> {
        let extent = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Image Test Output Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(&self.device, [self.width, self.height], "image test depth");

        apply_camera(&mut self.renderer, &self.camera, &self.projection);
        self.scene.render_scene(&mut self.renderer);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Image Test Encoder"),
            });
        self.renderer
            .render(&mut encoder, &target_view, &depth.view, self.clear_colour);

        // rows of a texture copy must be 256-byte aligned
        let unpadded_bytes_per_row = 4 * self.width;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Image Test Output Buffer"),
            size: (padded_bytes_per_row * self.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            extent,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .context("GPU did not finish the frame")?;
        rx.receive()
            .await
            .context("buffer mapping was cancelled")?
            .context("failed to map the output buffer")?;

        let data = buffer_slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * self.height) as usize);
        for row in data.chunks(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
        }
        drop(data);
        output_buffer.unmap();

        image::RgbaImage::from_raw(self.width, self.height, pixels)
            .context("read back pixel data does not match the image size")
    }

    /// Release the scene's textures.
    pub fn destroy(&mut self) {
        self.scene.destroy_textures(&mut self.renderer);
    }
}
