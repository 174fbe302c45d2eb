//! The desk scene: which resources it needs and how it is drawn.
//!
//! [`SceneManager`] owns the texture registry and the material table. It
//! talks to the GPU only through the [`Renderer`] collaborator traits, so the
//! whole draw sequence can run against a recording backend in tests.

use std::path::Path;

use crate::{
    bridge::{
        set_shader_color, set_shader_material, set_shader_texture, set_texture_uv_scale,
        set_transformations, setup_scene_lights,
    },
    data_structures::{material::MaterialTable, mesh::ShapeKind, transform::Transform},
    resources::{
        mesh::ShapeMeshes,
        texture::{TextureBackend, TextureRegistry},
    },
    shader::{self, ShaderUniforms},
};

/// Everything the scene needs from a rendering backend.
pub trait Renderer: ShaderUniforms + ShapeMeshes + TextureBackend {}

impl<T: ShaderUniforms + ShapeMeshes + TextureBackend + ?Sized> Renderer for T {}

/// Texture tags in load (and therefore slot) order.
pub const SCENE_TEXTURES: [&str; 8] = [
    "wood", "wall", "pot", "leaf", "lamp", "marble", "granite", "gold",
];

/// Meshes in load order. Only one mesh per kind is ever loaded.
pub const SCENE_MESHES: [ShapeKind; 9] = [
    ShapeKind::Plane,
    ShapeKind::Box,
    ShapeKind::Cone,
    ShapeKind::Prism,
    ShapeKind::Pyramid3,
    ShapeKind::Sphere,
    ShapeKind::Torus,
    ShapeKind::TaperedCylinder,
    ShapeKind::Cylinder,
];

pub const LEAF_COUNT: usize = 10;

/// Draw calls issued by one `render_scene`.
pub const DRAWS_PER_FRAME: usize = 10 + LEAF_COUNT;

#[derive(Debug, Default)]
pub struct SceneManager {
    textures: TextureRegistry,
    materials: MaterialTable,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load textures, materials and meshes. Call once before the first frame.
    ///
    /// Missing texture files are logged and skipped; a mesh that fails to load
    /// aborts preparation.
    pub fn prepare_scene<R: Renderer + ?Sized>(
        &mut self,
        backend: &mut R,
        assets_root: &Path,
    ) -> anyhow::Result<()> {
        self.load_scene_textures(backend, assets_root);
        self.load_scene_materials();
        for kind in SCENE_MESHES {
            backend.load_mesh(kind)?;
        }
        log::info!(
            "Scene prepared: {} textures, {} materials, {} meshes",
            self.textures.len(),
            self.materials.len(),
            SCENE_MESHES.len()
        );
        Ok(())
    }

    pub fn load_scene_textures<B: TextureBackend + ?Sized>(&mut self, backend: &mut B, assets_root: &Path) {
        for tag in SCENE_TEXTURES {
            let path = assets_root.join("textures").join(format!("{tag}.jpg"));
            // already logged by the registry
            let _ = self.textures.create_texture(backend, &path, tag);
        }
        self.textures.bind_textures(backend);
    }

    pub fn load_scene_materials(&mut self) {
        self.materials.extend(MaterialTable::scene_defaults());
    }

    /// Issue the draw calls of one frame.
    pub fn render_scene<R: Renderer + ?Sized>(&self, backend: &mut R) {
        setup_scene_lights(backend);

        // back wall
        set_transformations(
            backend,
            &Transform::from_parts([40.0, 1.0, 40.0], [-90.0, 0.0, 0.0], [0.0, 4.0, -10.0]),
        );
        set_shader_texture(backend, &self.textures, "wall");
        backend.set_bool(shader::USE_TEXTURE, true);
        set_texture_uv_scale(backend, 1.0, 1.0);
        set_shader_material(backend, &self.materials, "wall");
        backend.draw_mesh(ShapeKind::Plane);

        // desk surface
        set_transformations(
            backend,
            &Transform::from_parts([20.0, 1.0, 20.0], [0.0, 0.0, 0.0], [0.0, -0.5, 0.0]),
        );
        set_shader_material(backend, &self.materials, "wall");
        set_shader_color(backend, 1.0, 1.0, 1.0, 1.0);
        backend.draw_mesh(ShapeKind::Plane);

        self.render_lamp(backend);
        self.render_clock(backend);
        self.render_plant(backend);
    }

    fn render_lamp<R: Renderer + ?Sized>(&self, backend: &mut R) {
        // base, granite so it does not wash out against the desk
        set_transformations(
            backend,
            &Transform::from_parts([1.5, 0.2, 1.5], [0.0, 0.0, 0.0], [5.0, 0.0, 0.0]),
        );
        set_shader_material(backend, &self.materials, "granite");
        set_shader_color(backend, 0.85, 0.85, 0.85, 1.0);
        backend.draw_mesh(ShapeKind::Cylinder);

        // neck
        set_transformations(
            backend,
            &Transform::from_parts([0.05, 4.0, 0.05], [0.0, 0.0, 0.0], [6.0, 0.0, 0.0]),
        );
        set_shader_material(backend, &self.materials, "lamp");
        backend.draw_mesh(ShapeKind::Cylinder);

        // shade
        set_transformations(
            backend,
            &Transform::from_parts([1.2, 1.5, 1.2], [-45.0, 0.0, 0.0], [5.5, 3.8, 0.0]),
        );
        set_shader_material(backend, &self.materials, "lamp");
        backend.draw_mesh(ShapeKind::TaperedCylinder);

        // bulb
        set_transformations(
            backend,
            &Transform::from_parts([0.2, 0.2, 0.2], [0.0, 0.0, 0.0], [5.5, 3.6, 0.0]),
        );
        set_shader_color(backend, 1.0, 1.0, 0.0, 1.0);
        backend.set_bool(shader::USE_TEXTURE, false);
        backend.draw_mesh(ShapeKind::Sphere);

        // joint
        set_transformations(
            backend,
            &Transform::from_parts([0.15, 0.3, 0.15], [0.0, 0.0, 90.0], [6.0, 4.0, -0.2]),
        );
        set_shader_material(backend, &self.materials, "gold");
        backend.draw_mesh(ShapeKind::Cylinder);
    }

    fn render_clock<R: Renderer + ?Sized>(&self, backend: &mut R) {
        // rim
        set_transformations(
            backend,
            &Transform::from_parts([1.6, 0.05, 1.6], [90.0, 0.0, 0.0], [-2.0, 7.0, -4.95]),
        );
        set_shader_material(backend, &self.materials, "marble");
        backend.set_bool(shader::USE_TEXTURE, false);
        set_shader_color(backend, 0.2, 0.2, 0.2, 1.0);
        backend.draw_mesh(ShapeKind::Cylinder);

        // face
        set_transformations(
            backend,
            &Transform::from_parts([1.5, 0.1, 1.5], [90.0, 0.0, 0.0], [-2.0, 7.0, -4.9]),
        );
        set_shader_texture(backend, &self.textures, "wood");
        backend.set_bool(shader::USE_TEXTURE, true);
        backend.draw_mesh(ShapeKind::Cylinder);
    }

    fn render_plant<R: Renderer + ?Sized>(&self, backend: &mut R) {
        // pot
        set_transformations(
            backend,
            &Transform::from_parts([1.2, 1.0, 1.2], [0.0, 0.0, 0.0], [2.0, 0.5, 0.0]),
        );
        set_shader_material(backend, &self.materials, "granite");
        set_shader_color(backend, 0.8, 0.8, 0.8, 1.0);
        backend.draw_mesh(ShapeKind::Sphere);

        backend.set_bool(shader::USE_TEXTURE, true);
        set_shader_texture(backend, &self.textures, "leaf");
        for i in 0..LEAF_COUNT {
            set_transformations(backend, &leaf_transform(i, LEAF_COUNT));
            backend.draw_mesh(ShapeKind::TaperedCylinder);
        }
    }

    /// Release every texture this scene loaded.
    pub fn destroy_textures<B: TextureBackend + ?Sized>(&mut self, backend: &mut B) {
        self.textures.destroy_textures(backend);
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }
}

/// Leaf `index` of `count`, fanned out evenly around the pot.
///
/// Heights cycle through three sizes, each leaf tilts a little further out
/// than the previous one and the lean alternates direction.
pub fn leaf_transform(index: usize, count: usize) -> Transform {
    let height = 1.5 + (index % 3) as f32 * 0.2;
    let y_rotation = index as f32 * (360.0 / count as f32);
    let x_tilt = 20.0 + index as f32 * 3.0;
    let z_lean = if index % 2 == 0 { 5.0 } else { -5.0 };
    Transform::from_parts([0.12, height, 0.4], [x_tilt, y_rotation, z_lean], [2.0, 1.3, 0.0])
}
