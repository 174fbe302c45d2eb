//! Procedural primitive geometry.
//!
//! Every shape is a unit primitive with outward normals, texture coordinates
//! and counter-clockwise winding seen from outside. Y is up.
//!
//! - plane: XZ square from -1 to 1, facing +Y
//! - box: cube from -0.5 to 0.5
//! - cylinder / tapered cylinder / cone: base on y = 0, top on y = 1,
//!   base radius 1 (tapered top radius 0.5, cone apex)
//! - sphere: radius 1 around the origin
//! - torus: ring radius 1, tube radius 0.2, lying in the XY plane
//! - prism: triangle in XY extruded from z = -0.5 to 0.5
//! - pyramid3: triangular base on y = -0.5, apex on y = 0.5

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::mesh::{ShapeKind, ShapeVertex};

const ROUND_SEGMENTS: u32 = 36;
const SPHERE_RINGS: u32 = 18;
const TORUS_TUBE_SEGMENTS: u32 = 12;
const TORUS_TUBE_RADIUS: f32 = 0.2;
const TAPERED_TOP_RADIUS: f32 = 0.5;

/// Vertex and index data ready for GPU upload.
#[derive(Clone, Debug, Default)]
pub struct GeometryData {
    pub vertices: Vec<ShapeVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vector3<f32>, normal: Vector3<f32>, tex_coords: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(ShapeVertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
        });
        index
    }

    fn push_flat_triangle(&mut self, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) {
        let normal = (b - a).cross(c - a).normalize();
        let ia = self.push(a, normal, [0.0, 0.0]);
        let ib = self.push(b, normal, [1.0, 0.0]);
        let ic = self.push(c, normal, [0.5, 1.0]);
        self.indices.extend_from_slice(&[ia, ib, ic]);
    }

    /// Corners go bottom-left, bottom-right, top-right, top-left seen from outside.
    fn push_flat_quad(&mut self, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>, d: Vector3<f32>) {
        let normal = (b - a).cross(c - a).normalize();
        let ia = self.push(a, normal, [0.0, 0.0]);
        let ib = self.push(b, normal, [1.0, 0.0]);
        let ic = self.push(c, normal, [1.0, 1.0]);
        let id = self.push(d, normal, [0.0, 1.0]);
        self.indices.extend_from_slice(&[ia, ib, ic, ia, ic, id]);
    }

    /// A `columns` x `rows` patch over a parametric surface.
    ///
    /// `surface(u, v)` returns position and normal for u, v in [0, 1]. The cross
    /// product of the u and v directions must point outwards.
    fn push_grid<F>(&mut self, columns: u32, rows: u32, surface: F)
    where
        F: Fn(f32, f32) -> (Vector3<f32>, Vector3<f32>),
    {
        let base = self.vertices.len() as u32;
        for row in 0..=rows {
            let v = row as f32 / rows as f32;
            for column in 0..=columns {
                let u = column as f32 / columns as f32;
                let (position, normal) = surface(u, v);
                self.push(position, normal, [u, v]);
            }
        }
        let stride = columns + 1;
        for row in 0..rows {
            for column in 0..columns {
                let a = base + row * stride + column;
                let b = a + 1;
                let c = b + stride;
                let d = a + stride;
                self.indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
    }

    /// Flat disc at height `y`, facing +Y when `up` and -Y otherwise.
    fn push_disc(&mut self, y: f32, radius: f32, segments: u32, up: bool) {
        let normal = if up {
            Vector3::unit_y()
        } else {
            -Vector3::unit_y()
        };
        let center = self.push(Vector3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
        let ring = self.vertices.len() as u32;
        for i in 0..=segments {
            let angle = i as f32 * TAU / segments as f32;
            let (sin, cos) = angle.sin_cos();
            self.push(
                Vector3::new(radius * sin, y, radius * cos),
                normal,
                [0.5 + 0.5 * sin, 0.5 + 0.5 * cos],
            );
        }
        for i in 0..segments {
            let current = ring + i;
            let next = current + 1;
            if up {
                self.indices.extend_from_slice(&[center, current, next]);
            } else {
                self.indices.extend_from_slice(&[center, next, current]);
            }
        }
    }
}

/// Geometry for `kind`, built with the crate's default resolution.
pub fn generate(kind: ShapeKind) -> GeometryData {
    match kind {
        ShapeKind::Plane => generate_plane(),
        ShapeKind::Box => generate_box(),
        ShapeKind::Cone => generate_frustum(1.0, 0.0, ROUND_SEGMENTS, false),
        ShapeKind::Prism => generate_prism(),
        ShapeKind::Pyramid3 => generate_pyramid3(),
        ShapeKind::Sphere => generate_sphere(ROUND_SEGMENTS, SPHERE_RINGS),
        ShapeKind::Torus => generate_torus(ROUND_SEGMENTS, TORUS_TUBE_SEGMENTS),
        ShapeKind::Cylinder => generate_frustum(1.0, 1.0, ROUND_SEGMENTS, true),
        ShapeKind::TaperedCylinder => {
            generate_frustum(1.0, TAPERED_TOP_RADIUS, ROUND_SEGMENTS, true)
        }
    }
}

pub fn generate_plane() -> GeometryData {
    let mut data = GeometryData::new();
    let normal = Vector3::unit_y();
    data.push(Vector3::new(-1.0, 0.0, -1.0), normal, [0.0, 1.0]);
    data.push(Vector3::new(1.0, 0.0, -1.0), normal, [1.0, 1.0]);
    data.push(Vector3::new(1.0, 0.0, 1.0), normal, [1.0, 0.0]);
    data.push(Vector3::new(-1.0, 0.0, 1.0), normal, [0.0, 0.0]);
    data.indices = vec![0, 3, 2, 0, 2, 1];
    data
}

pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::new();
    let h = 0.5;
    let p = |x: f32, y: f32, z: f32| Vector3::new(x * h, y * h, z * h);
    // front, back
    data.push_flat_quad(p(-1., -1., 1.), p(1., -1., 1.), p(1., 1., 1.), p(-1., 1., 1.));
    data.push_flat_quad(p(1., -1., -1.), p(-1., -1., -1.), p(-1., 1., -1.), p(1., 1., -1.));
    // right, left
    data.push_flat_quad(p(1., -1., 1.), p(1., -1., -1.), p(1., 1., -1.), p(1., 1., 1.));
    data.push_flat_quad(p(-1., -1., -1.), p(-1., -1., 1.), p(-1., 1., 1.), p(-1., 1., -1.));
    // top, bottom
    data.push_flat_quad(p(-1., 1., 1.), p(1., 1., 1.), p(1., 1., -1.), p(-1., 1., -1.));
    data.push_flat_quad(p(-1., -1., -1.), p(1., -1., -1.), p(1., -1., 1.), p(-1., -1., 1.));
    data
}

/// Side wall from y = 0 (radius `bottom_radius`) to y = 1 (radius `top_radius`).
///
/// The bottom is always capped; the top only when `cap_top` is set and the
/// top radius is not zero.
pub fn generate_frustum(
    bottom_radius: f32,
    top_radius: f32,
    segments: u32,
    cap_top: bool,
) -> GeometryData {
    let segments = segments.max(3);
    let mut data = GeometryData::new();
    let slope = bottom_radius - top_radius;
    data.push_grid(segments, 1, |u, v| {
        let (sin, cos) = (u * TAU).sin_cos();
        let radius = bottom_radius + (top_radius - bottom_radius) * v;
        let position = Vector3::new(radius * sin, v, radius * cos);
        let normal = Vector3::new(sin, slope, cos).normalize();
        (position, normal)
    });
    data.push_disc(0.0, bottom_radius, segments, false);
    if cap_top && top_radius > 0.0 {
        data.push_disc(1.0, top_radius, segments, true);
    }
    data
}

pub fn generate_sphere(segments: u32, rings: u32) -> GeometryData {
    let mut data = GeometryData::new();
    data.push_grid(segments.max(3), rings.max(2), |u, v| {
        let (sin_lon, cos_lon) = (u * TAU).sin_cos();
        let (sin_lat, cos_lat) = (v * PI - FRAC_PI_2).sin_cos();
        let normal = Vector3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon);
        (normal, normal)
    });
    data
}

pub fn generate_torus(ring_segments: u32, tube_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    data.push_grid(ring_segments.max(3), tube_segments.max(3), |u, v| {
        let (sin_ring, cos_ring) = (u * TAU).sin_cos();
        let (sin_tube, cos_tube) = (v * TAU).sin_cos();
        let center = Vector3::new(cos_ring, sin_ring, 0.0);
        let normal = Vector3::new(cos_tube * cos_ring, cos_tube * sin_ring, sin_tube);
        (center + normal * TORUS_TUBE_RADIUS, normal)
    });
    data
}

pub fn generate_prism() -> GeometryData {
    let mut data = GeometryData::new();
    let front = |x: f32, y: f32| Vector3::new(x, y, 0.5);
    let back = |x: f32, y: f32| Vector3::new(x, y, -0.5);
    let (a, b, c) = ((-0.5, -0.5), (0.5, -0.5), (0.0, 0.5));

    data.push_flat_triangle(front(a.0, a.1), front(b.0, b.1), front(c.0, c.1));
    data.push_flat_triangle(back(a.0, a.1), back(c.0, c.1), back(b.0, b.1));
    // bottom
    data.push_flat_quad(back(a.0, a.1), back(b.0, b.1), front(b.0, b.1), front(a.0, a.1));
    // right slope
    data.push_flat_quad(front(b.0, b.1), back(b.0, b.1), back(c.0, c.1), front(c.0, c.1));
    // left slope
    data.push_flat_quad(back(a.0, a.1), front(a.0, a.1), front(c.0, c.1), back(c.0, c.1));
    data
}

pub fn generate_pyramid3() -> GeometryData {
    let mut data = GeometryData::new();
    let left = Vector3::new(-0.5, -0.5, 0.5);
    let right = Vector3::new(0.5, -0.5, 0.5);
    let rear = Vector3::new(0.0, -0.5, -0.5);
    let apex = Vector3::new(0.0, 0.5, 0.0);

    data.push_flat_triangle(left, rear, right);
    data.push_flat_triangle(left, right, apex);
    data.push_flat_triangle(right, rear, apex);
    data.push_flat_triangle(rear, left, apex);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(kind: ShapeKind, data: &GeometryData) {
        assert!(data.vertex_count() > 0, "{kind} has no vertices");
        assert_eq!(data.indices.len() % 3, 0, "{kind} is not a triangle list");
        let max = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < max), "{kind} index out of range");
        for vertex in &data.vertices {
            let length = Vector3::from(vertex.normal).magnitude();
            assert!((length - 1.0).abs() < 1e-4, "{kind} normal not unit length");
        }
    }

    #[test]
    fn every_shape_is_well_formed() {
        for kind in crate::scene::SCENE_MESHES {
            assert_well_formed(kind, &generate(kind));
        }
    }

    #[test]
    fn plane_faces_up() {
        let plane = generate_plane();
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.triangle_count(), 2);
        assert!(plane.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        let tri: Vec<Vector3<f32>> = plane.indices[..3]
            .iter()
            .map(|&i| plane.vertices[i as usize].position.into())
            .collect();
        let winding = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
        assert!(winding.y > 0.0);
    }

    #[test]
    fn box_generation() {
        let cube = generate_box();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        for v in &cube.vertices {
            let p = Vector3::from(v.position);
            let n = Vector3::from(v.normal);
            // every face normal points away from the centre
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn cylinder_spans_unit_height() {
        let cylinder = generate(ShapeKind::Cylinder);
        let (min, max) = cylinder
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| {
                (lo.min(v.position[1]), hi.max(v.position[1]))
            });
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn tapered_cylinder_narrows_towards_the_top() {
        let tapered = generate(ShapeKind::TaperedCylinder);
        let radius_at = |y: f32| {
            tapered
                .vertices
                .iter()
                .filter(|v| v.position[1] == y)
                .map(|v| Vector3::new(v.position[0], 0.0, v.position[2]).magnitude())
                .fold(0.0f32, f32::max)
        };
        assert!((radius_at(0.0) - 1.0).abs() < 1e-5);
        assert!((radius_at(1.0) - TAPERED_TOP_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        for v in &sphere.vertices {
            assert!((Vector3::from(v.position).magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn pyramid_faces_point_outwards() {
        let pyramid = generate_pyramid3();
        assert_eq!(pyramid.triangle_count(), 4);
        // centroid of the tetrahedron
        let centre = Vector3::new(0.0, -0.25, 0.125);
        for tri in pyramid.indices.chunks(3) {
            let v = &pyramid.vertices[tri[0] as usize];
            let to_face = Vector3::from(v.position) - centre;
            assert!(to_face.dot(Vector3::from(v.normal)) > 0.0);
        }
    }
}
