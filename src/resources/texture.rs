use std::path::Path;

use anyhow::{Context, bail, ensure};

use crate::resources::load_binary;

/// Maximum number of textures the registry keeps (one per texture slot).
pub const MAX_TEXTURES: usize = 16;

/// Opaque handle of a texture living on the GPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// The GPU side of texture management.
///
/// The registry decodes images and keeps the tag bookkeeping; the backend
/// owns the actual GPU objects.
pub trait TextureBackend {
    fn create_texture(&mut self, tag: &str, image: &image::RgbaImage) -> anyhow::Result<TextureHandle>;
    fn bind_texture(&mut self, slot: usize, handle: TextureHandle);
    fn release_texture(&mut self, handle: TextureHandle);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureEntry {
    pub tag: String,
    pub handle: TextureHandle,
}

/// Tagged textures. Entry `i` is bound to texture slot `i`.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image file, upload it and register it under `tag`.
    pub fn create_texture<B: TextureBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        path: &Path,
        tag: &str,
    ) -> anyhow::Result<()> {
        let result = self.try_create_texture(backend, path, tag);
        if let Err(e) = &result {
            log::error!("Could not load image {}: {:#}", path.display(), e);
        }
        result
    }

    fn try_create_texture<B: TextureBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        path: &Path,
        tag: &str,
    ) -> anyhow::Result<()> {
        ensure!(
            self.entries.len() < MAX_TEXTURES,
            "all {MAX_TEXTURES} texture slots are taken"
        );
        ensure!(
            self.texture_slot(tag).is_none(),
            "texture tag {tag} is already registered"
        );
        let bytes = load_binary(path)?;
        let (image, channels) = decode_texture_image(&bytes)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        log::info!(
            "Successfully loaded image {}, width: {}, height: {}, channels: {}",
            path.display(),
            image.width(),
            image.height(),
            channels
        );
        let handle = backend.create_texture(tag, &image)?;
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(())
    }

    /// Bind every registered texture to the slot matching its position.
    pub fn bind_textures<B: TextureBackend + ?Sized>(&self, backend: &mut B) {
        for (slot, entry) in self.entries.iter().enumerate() {
            backend.bind_texture(slot, entry.handle);
        }
    }

    /// Release every GPU texture and forget all tags.
    pub fn destroy_textures<B: TextureBackend + ?Sized>(&mut self, backend: &mut B) {
        for entry in self.entries.drain(..) {
            log::debug!("Releasing texture {}", entry.tag);
            backend.release_texture(entry.handle);
        }
    }

    pub fn texture_id(&self, tag: &str) -> Option<TextureHandle> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.handle)
    }

    pub fn texture_slot(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == tag)
    }

    /// GPU handle for `tag`, or `-1` when nothing is registered under it.
    pub fn find_texture_id(&self, tag: &str) -> i32 {
        self.texture_id(tag).map_or(-1, |handle| handle.0 as i32)
    }

    /// Texture slot for `tag`, or `-1` when nothing is registered under it.
    pub fn find_texture_slot(&self, tag: &str) -> i32 {
        self.texture_slot(tag).map_or(-1, |slot| slot as i32)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }
}

/// Decode image bytes into a vertically flipped RGBA8 image.
///
/// Only RGB and RGBA sources are accepted. Returns the image together with
/// the channel count of the source.
pub fn decode_texture_image(bytes: &[u8]) -> anyhow::Result<(image::RgbaImage, u8)> {
    let img = image::load_from_memory(bytes)?;
    let channels = img.color().channel_count();
    match channels {
        3 | 4 => Ok((img.flipv().to_rgba8(), channels)),
        other => bail!("not implemented to handle images with {other} channels"),
    }
}

pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Scene texture_bind_group_layout"),
    })
}
