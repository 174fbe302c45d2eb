use wgpu::util::DeviceExt;

use crate::{
    data_structures::mesh::{Mesh, ShapeKind},
    resources::geometry::{self, GeometryData},
};

/// Loading and drawing of the primitive meshes.
///
/// A draw uses whatever uniforms were written before it, so callers set the
/// transform, colour and material first and then call `draw_mesh`.
pub trait ShapeMeshes {
    fn load_mesh(&mut self, kind: ShapeKind) -> anyhow::Result<()>;
    fn draw_mesh(&mut self, kind: ShapeKind);
}

/// Generate the geometry for `kind` and upload it.
pub fn load_shape_mesh(device: &wgpu::Device, kind: ShapeKind) -> anyhow::Result<Mesh> {
    let data = geometry::generate(kind);
    anyhow::ensure!(
        !data.indices.is_empty(),
        "generated {kind} mesh has no triangles"
    );
    log::debug!(
        "Generated {kind} mesh: {} vertices, {} triangles",
        data.vertex_count(),
        data.triangle_count()
    );
    Ok(upload_mesh(device, kind, &data))
}

pub fn upload_mesh(device: &wgpu::Device, kind: ShapeKind, data: &GeometryData) -> Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{kind} Vertex Buffer")),
        contents: bytemuck::cast_slice(&data.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{kind} Index Buffer")),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Mesh {
        kind,
        vertex_buffer,
        index_buffer,
        num_elements: data.indices.len() as u32,
    }
}
