//! Primitive meshes: the shape kinds, their vertex format and GPU buffers.

use std::fmt;

/// The primitive shapes the scene is built from.
///
/// Only one mesh per kind lives on the GPU; every object of that kind draws
/// the same buffers with its own transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Plane,
    Box,
    Cone,
    Prism,
    Pyramid3,
    Sphere,
    Torus,
    Cylinder,
    TaperedCylinder,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Plane => "plane",
            ShapeKind::Box => "box",
            ShapeKind::Cone => "cone",
            ShapeKind::Prism => "prism",
            ShapeKind::Pyramid3 => "pyramid3",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Torus => "torus",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::TaperedCylinder => "tapered cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes how a vertex type is laid out in a vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ShapeVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // tex_coords
    ];
}

impl Vertex for ShapeVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A primitive uploaded to the GPU.
#[derive(Debug)]
pub struct Mesh {
    pub kind: ShapeKind,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}
