//! wgpu backend for the scene.
//!
//! The scene is written against an immediate-mode model: uniforms are set by
//! name, they stay set until overwritten, and every `draw_mesh` uses whatever
//! is current. [`SceneRenderer`] emulates that on top of wgpu:
//!
//! - uniform writes mutate a CPU-side [`ShaderState`]
//! - `draw_mesh` snapshots the current state into a [`DrawCall`]
//! - [`SceneRenderer::render`] uploads all snapshots of the frame into one
//!   dynamic-offset uniform buffer and replays them in a single render pass
//!
//! # Texture slots
//!
//! Each of the [`MAX_TEXTURES`] slots owns a bind group. A draw whose
//! `objectTexture` slot is `-1`, out of range or empty samples a 1x1 white
//! texture instead.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use crate::{
    data_structures::{
        mesh::{Mesh, ShapeKind},
        texture::Texture,
    },
    pipelines::basic::mk_basic_pipeline,
    resources::{
        mesh::{ShapeMeshes, load_shape_mesh},
        texture::{MAX_TEXTURES, TextureBackend, TextureHandle},
    },
    shader::{self, ShaderUniforms},
};

/// Every uniform the scene shader reads, laid out for a WGSL uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderState {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub use_lighting: u32,
    pub material_ambient_color: [f32; 3],
    pub material_ambient_strength: f32,
    pub material_diffuse_color: [f32; 3],
    pub material_shininess: f32,
    pub material_specular_color: [f32; 3],
    pub texture_slot: i32,
    pub dir_light_direction: [f32; 4],
    pub dir_light_ambient: [f32; 4],
    pub dir_light_diffuse: [f32; 4],
    pub dir_light_specular: [f32; 4],
    pub spot_light_position: [f32; 4],
    pub spot_light_direction: [f32; 4],
    pub spot_light_ambient: [f32; 4],
    pub spot_light_diffuse: [f32; 4],
    pub spot_light_specular: [f32; 4],
    pub spot_light_constant: f32,
    pub spot_light_linear: f32,
    pub spot_light_quadratic: f32,
    pub spot_light_cut_off: f32,
    pub spot_light_outer_cut_off: f32,
    pub _padding: [f32; 3],
}

impl Default for ShaderState {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        Self {
            model: identity,
            view: identity,
            projection: identity,
            view_position: [0.0, 0.0, 0.0, 1.0],
            object_color: [1.0, 1.0, 1.0, 1.0],
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            use_lighting: 0,
            material_ambient_color: [1.0, 1.0, 1.0],
            material_ambient_strength: 1.0,
            material_diffuse_color: [1.0, 1.0, 1.0],
            material_shininess: 1.0,
            material_specular_color: [0.0, 0.0, 0.0],
            texture_slot: -1,
            dir_light_direction: [0.0; 4],
            dir_light_ambient: [0.0; 4],
            dir_light_diffuse: [0.0; 4],
            dir_light_specular: [0.0; 4],
            spot_light_position: [0.0; 4],
            spot_light_direction: [0.0; 4],
            spot_light_ambient: [0.0; 4],
            spot_light_diffuse: [0.0; 4],
            spot_light_specular: [0.0; 4],
            spot_light_constant: 1.0,
            spot_light_linear: 0.0,
            spot_light_quadratic: 0.0,
            spot_light_cut_off: 0.0,
            spot_light_outer_cut_off: 0.0,
            _padding: [0.0; 3],
        }
    }
}

impl ShaderState {
    /// Applies a named `vec3` write. Returns false for unknown names.
    fn write_vec3(&mut self, name: &str, v: Vector3<f32>) -> bool {
        let padded = [v.x, v.y, v.z, 0.0];
        match name {
            shader::VIEW_POSITION => self.view_position = [v.x, v.y, v.z, 1.0],
            shader::MATERIAL_AMBIENT_COLOR => self.material_ambient_color = v.into(),
            shader::MATERIAL_DIFFUSE_COLOR => self.material_diffuse_color = v.into(),
            shader::MATERIAL_SPECULAR_COLOR => self.material_specular_color = v.into(),
            shader::DIR_LIGHT_DIRECTION => self.dir_light_direction = padded,
            shader::DIR_LIGHT_AMBIENT => self.dir_light_ambient = padded,
            shader::DIR_LIGHT_DIFFUSE => self.dir_light_diffuse = padded,
            shader::DIR_LIGHT_SPECULAR => self.dir_light_specular = padded,
            shader::SPOT_LIGHT_POSITION => self.spot_light_position = [v.x, v.y, v.z, 1.0],
            shader::SPOT_LIGHT_DIRECTION => self.spot_light_direction = padded,
            shader::SPOT_LIGHT_AMBIENT => self.spot_light_ambient = padded,
            shader::SPOT_LIGHT_DIFFUSE => self.spot_light_diffuse = padded,
            shader::SPOT_LIGHT_SPECULAR => self.spot_light_specular = padded,
            _ => return false,
        }
        true
    }

    fn write_float(&mut self, name: &str, value: f32) -> bool {
        match name {
            shader::MATERIAL_AMBIENT_STRENGTH => self.material_ambient_strength = value,
            shader::MATERIAL_SHININESS => self.material_shininess = value,
            shader::SPOT_LIGHT_CONSTANT => self.spot_light_constant = value,
            shader::SPOT_LIGHT_LINEAR => self.spot_light_linear = value,
            shader::SPOT_LIGHT_QUADRATIC => self.spot_light_quadratic = value,
            shader::SPOT_LIGHT_CUT_OFF => self.spot_light_cut_off = value,
            shader::SPOT_LIGHT_OUTER_CUT_OFF => self.spot_light_outer_cut_off = value,
            _ => return false,
        }
        true
    }

    fn write_int(&mut self, name: &str, value: i32) -> bool {
        match name {
            shader::USE_TEXTURE => self.use_texture = (value != 0) as u32,
            shader::USE_LIGHTING => self.use_lighting = (value != 0) as u32,
            shader::OBJECT_TEXTURE => self.texture_slot = value,
            _ => return false,
        }
        true
    }
}

/// One recorded draw: which mesh and the uniforms that were current.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall {
    pub kind: ShapeKind,
    pub state: ShaderState,
}

const INITIAL_DRAW_CAPACITY: u64 = 32;

pub struct SceneRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,

    state: ShaderState,
    draws: Vec<DrawCall>,

    uniform_stride: u64,
    uniform_capacity: u64,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    meshes: HashMap<ShapeKind, Mesh>,

    // indexed by TextureHandle; released handles leave a hole
    textures: Vec<Option<Texture>>,
    slot_bind_groups: Vec<Option<(TextureHandle, wgpu::BindGroup)>>,
    fallback_bind_group: wgpu::BindGroup,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let (pipeline, uniform_layout, texture_layout) = mk_basic_pipeline(device, color_format);

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = align_to(std::mem::size_of::<ShaderState>() as u64, alignment);
        let uniform_capacity = INITIAL_DRAW_CAPACITY;
        let uniform_buffer = create_uniform_buffer(device, uniform_stride * uniform_capacity);
        let uniform_bind_group = create_uniform_bind_group(device, &uniform_layout, &uniform_buffer);

        let white = Texture::create_solid([255, 255, 255, 255], "Fallback Texture", device, queue);
        let fallback_bind_group = create_texture_bind_group(device, &texture_layout, &white, "Fallback");

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            uniform_layout,
            texture_layout,
            state: ShaderState::default(),
            draws: Vec::new(),
            uniform_stride,
            uniform_capacity,
            uniform_buffer,
            uniform_bind_group,
            meshes: HashMap::new(),
            textures: Vec::new(),
            slot_bind_groups: (0..MAX_TEXTURES).map(|_| None).collect(),
            fallback_bind_group,
        }
    }

    /// Uniforms that the next draw will use.
    pub fn state(&self) -> &ShaderState {
        &self.state
    }

    /// Draws recorded since the last [`render`](Self::render).
    pub fn pending_draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn has_mesh(&self, kind: ShapeKind) -> bool {
        self.meshes.contains_key(&kind)
    }

    /// Clear the targets and replay every draw recorded since the last call.
    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let mut draws = std::mem::take(&mut self.draws);
        self.ensure_uniform_capacity(draws.len() as u64);

        if !draws.is_empty() {
            let stride = self.uniform_stride as usize;
            let mut bytes = vec![0u8; draws.len() * stride];
            for (i, draw) in draws.iter().enumerate() {
                let block = bytemuck::bytes_of(&draw.state);
                bytes[i * stride..i * stride + block.len()].copy_from_slice(block);
            }
            self.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            for (i, draw) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.kind) else {
                    continue;
                };
                let offset = (i as u64 * self.uniform_stride) as wgpu::DynamicOffset;
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                render_pass.set_bind_group(1, self.texture_bind_group(draw.state.texture_slot), &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }

        draws.clear();
        self.draws = draws;
    }

    fn texture_bind_group(&self, slot: i32) -> &wgpu::BindGroup {
        resolve_slot(&self.slot_bind_groups, slot).unwrap_or(&self.fallback_bind_group)
    }

    fn ensure_uniform_capacity(&mut self, draws: u64) {
        if draws <= self.uniform_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!(
            "Growing uniform buffer from {} to {} draws",
            self.uniform_capacity,
            capacity
        );
        self.uniform_buffer = create_uniform_buffer(&self.device, self.uniform_stride * capacity);
        self.uniform_bind_group =
            create_uniform_bind_group(&self.device, &self.uniform_layout, &self.uniform_buffer);
        self.uniform_capacity = capacity;
    }
}

/// What is bound to texture `slot`, or `None` for `-1`, out of range or empty slots.
fn resolve_slot<T>(slots: &[Option<(TextureHandle, T)>], slot: i32) -> Option<&T> {
    usize::try_from(slot)
        .ok()
        .and_then(|slot| slots.get(slot))
        .and_then(|bound| bound.as_ref())
        .map(|(_, value)| value)
}

/// Empty every slot that still points at `handle`.
fn unbind_handle<T>(slots: &mut [Option<(TextureHandle, T)>], handle: TextureHandle) {
    for bound in slots.iter_mut() {
        if bound.as_ref().is_some_and(|(h, _)| *h == handle) {
            *bound = None;
        }
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

fn create_uniform_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Uniform Buffer"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Uniform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<ShaderState>() as u64),
            }),
        }],
    })
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    let sampler = texture
        .sampler
        .clone()
        .unwrap_or_else(|| crate::data_structures::texture::create_default_sampler(device));
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} Texture Bind Group")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

fn unknown_uniform(kind: &str, name: &str) {
    log::debug!("Ignoring write to unknown {kind} uniform {name}");
}

impl ShaderUniforms for SceneRenderer {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        let value: [[f32; 4]; 4] = value.into();
        match name {
            shader::MODEL => self.state.model = value,
            shader::VIEW => self.state.view = value,
            shader::PROJECTION => self.state.projection = value,
            _ => unknown_uniform("mat4", name),
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        match name {
            shader::OBJECT_COLOR => self.state.object_color = value.into(),
            _ => unknown_uniform("vec4", name),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        if !self.state.write_vec3(name, value) {
            unknown_uniform("vec3", name);
        }
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        match name {
            shader::UV_SCALE => self.state.uv_scale = value.into(),
            _ => unknown_uniform("vec2", name),
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        if !self.state.write_float(name, value) {
            unknown_uniform("float", name);
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        if !self.state.write_int(name, value) {
            unknown_uniform("int", name);
        }
    }

    fn set_sampler(&mut self, name: &str, slot: i32) {
        self.set_int(name, slot);
    }
}

impl ShapeMeshes for SceneRenderer {
    fn load_mesh(&mut self, kind: ShapeKind) -> anyhow::Result<()> {
        let mesh = load_shape_mesh(&self.device, kind)?;
        self.meshes.insert(kind, mesh);
        Ok(())
    }

    fn draw_mesh(&mut self, kind: ShapeKind) {
        if !self.meshes.contains_key(&kind) {
            log::warn!("Skipping draw of {kind}: mesh was never loaded");
            return;
        }
        self.draws.push(DrawCall {
            kind,
            state: self.state,
        });
    }
}

impl TextureBackend for SceneRenderer {
    fn create_texture(&mut self, tag: &str, image: &image::RgbaImage) -> anyhow::Result<TextureHandle> {
        let texture = Texture::from_rgba(&self.device, &self.queue, image, Some(tag))?;
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(Some(texture));
        Ok(handle)
    }

    fn bind_texture(&mut self, slot: usize, handle: TextureHandle) {
        let Some(bound) = self.slot_bind_groups.get_mut(slot) else {
            log::warn!("Texture slot {slot} is out of range (max {MAX_TEXTURES})");
            return;
        };
        let Some(Some(texture)) = self.textures.get(handle.0 as usize) else {
            log::warn!("Cannot bind unknown texture handle {} to slot {slot}", handle.0);
            return;
        };
        let group = create_texture_bind_group(
            &self.device,
            &self.texture_layout,
            texture,
            &format!("Slot {slot}"),
        );
        *bound = Some((handle, group));
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        unbind_handle(&mut self.slot_bind_groups, handle);
        if let Some(texture) = self.textures.get_mut(handle.0 as usize).and_then(Option::take) {
            texture.texture.destroy();
        }
    }
}
