//! Translates scene-level intent (place this object, colour it, use that
//! texture or material) into named uniform writes.

use cgmath::{Angle, Deg, Vector2, Vector3, Vector4};

use crate::{
    data_structures::{material::MaterialTable, transform::Transform},
    resources::texture::TextureRegistry,
    shader::{self, ShaderUniforms},
};

/// Directional "room" light.
pub const DIR_LIGHT_DIRECTION: [f32; 3] = [-0.5, -0.8, 0.8];
pub const DIR_LIGHT_AMBIENT: [f32; 3] = [0.3, 0.3, 0.3];
pub const DIR_LIGHT_DIFFUSE: [f32; 3] = [0.7, 0.7, 0.7];
pub const DIR_LIGHT_SPECULAR: [f32; 3] = [0.0, 0.0, 0.0];

/// The desk lamp's bulb.
pub const SPOT_LIGHT_POSITION: [f32; 3] = [5.5, 4.0, 0.5];
pub const SPOT_LIGHT_DIRECTION: [f32; 3] = [-0.8, -1.0, -0.2];
pub const SPOT_LIGHT_AMBIENT: [f32; 3] = [0.1, 0.1, 0.1];
// warm bulb
pub const SPOT_LIGHT_DIFFUSE: [f32; 3] = [1.0, 0.95, 0.8];
pub const SPOT_LIGHT_SPECULAR: [f32; 3] = [1.0, 1.0, 1.0];
pub const SPOT_LIGHT_CONSTANT: f32 = 1.0;
pub const SPOT_LIGHT_LINEAR: f32 = 0.045;
pub const SPOT_LIGHT_QUADRATIC: f32 = 0.0075;
pub const SPOT_LIGHT_INNER_ANGLE: Deg<f32> = Deg(15.0);
pub const SPOT_LIGHT_OUTER_ANGLE: Deg<f32> = Deg(25.0);

/// Write the model matrix for `transform`.
pub fn set_transformations<S: ShaderUniforms + ?Sized>(shader: &mut S, transform: &Transform) {
    shader.set_mat4(shader::MODEL, transform.to_matrix());
}

/// Switch to flat colouring. Texturing is turned off before the colour is set.
pub fn set_shader_color<S: ShaderUniforms + ?Sized>(shader: &mut S, r: f32, g: f32, b: f32, a: f32) {
    shader.set_bool(shader::USE_TEXTURE, false);
    shader.set_vec4(shader::OBJECT_COLOR, Vector4::new(r, g, b, a));
}

/// Switch to texturing with the texture registered under `tag`.
///
/// An unknown tag still enables texturing but points the sampler at slot `-1`.
pub fn set_shader_texture<S: ShaderUniforms + ?Sized>(
    shader: &mut S,
    textures: &TextureRegistry,
    tag: &str,
) {
    shader.set_bool(shader::USE_TEXTURE, true);
    let slot = textures.find_texture_slot(tag);
    if slot < 0 {
        log::debug!("No texture registered under {tag}");
    }
    shader.set_sampler(shader::OBJECT_TEXTURE, slot);
}

pub fn set_texture_uv_scale<S: ShaderUniforms + ?Sized>(shader: &mut S, u: f32, v: f32) {
    shader.set_vec2(shader::UV_SCALE, Vector2::new(u, v));
}

/// Write the lighting parameters of the material preset `tag`.
///
/// Leaves the current material untouched when the table is empty or has no
/// such preset.
pub fn set_shader_material<S: ShaderUniforms + ?Sized>(
    shader: &mut S,
    materials: &MaterialTable,
    tag: &str,
) {
    if materials.is_empty() {
        return;
    }
    let Some(material) = materials.find_material(tag) else {
        log::debug!("No material registered under {tag}");
        return;
    };
    shader.set_vec3(shader::MATERIAL_AMBIENT_COLOR, material.ambient_color);
    shader.set_float(shader::MATERIAL_AMBIENT_STRENGTH, material.ambient_strength);
    shader.set_vec3(shader::MATERIAL_DIFFUSE_COLOR, material.diffuse_color);
    shader.set_vec3(shader::MATERIAL_SPECULAR_COLOR, material.specular_color);
    shader.set_float(shader::MATERIAL_SHININESS, material.shininess);
}

pub fn set_camera_position<S: ShaderUniforms + ?Sized>(shader: &mut S, position: Vector3<f32>) {
    shader.set_vec3(shader::VIEW_POSITION, position);
}

/// Enable lighting and write the directional light and the lamp's spotlight.
pub fn setup_scene_lights<S: ShaderUniforms + ?Sized>(shader: &mut S) {
    shader.set_bool(shader::USE_LIGHTING, true);

    shader.set_vec3(shader::DIR_LIGHT_DIRECTION, DIR_LIGHT_DIRECTION.into());
    shader.set_vec3(shader::DIR_LIGHT_AMBIENT, DIR_LIGHT_AMBIENT.into());
    shader.set_vec3(shader::DIR_LIGHT_DIFFUSE, DIR_LIGHT_DIFFUSE.into());
    shader.set_vec3(shader::DIR_LIGHT_SPECULAR, DIR_LIGHT_SPECULAR.into());

    shader.set_vec3(shader::SPOT_LIGHT_POSITION, SPOT_LIGHT_POSITION.into());
    shader.set_vec3(shader::SPOT_LIGHT_DIRECTION, SPOT_LIGHT_DIRECTION.into());
    shader.set_vec3(shader::SPOT_LIGHT_AMBIENT, SPOT_LIGHT_AMBIENT.into());
    shader.set_vec3(shader::SPOT_LIGHT_DIFFUSE, SPOT_LIGHT_DIFFUSE.into());
    shader.set_vec3(shader::SPOT_LIGHT_SPECULAR, SPOT_LIGHT_SPECULAR.into());

    shader.set_float(shader::SPOT_LIGHT_CONSTANT, SPOT_LIGHT_CONSTANT);
    shader.set_float(shader::SPOT_LIGHT_LINEAR, SPOT_LIGHT_LINEAR);
    shader.set_float(shader::SPOT_LIGHT_QUADRATIC, SPOT_LIGHT_QUADRATIC);
    shader.set_float(shader::SPOT_LIGHT_CUT_OFF, SPOT_LIGHT_INNER_ANGLE.cos());
    shader.set_float(shader::SPOT_LIGHT_OUTER_CUT_OFF, SPOT_LIGHT_OUTER_ANGLE.cos());
}

