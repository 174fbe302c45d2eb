//! Named shader uniforms.
//!
//! The scene never talks to a pipeline directly. It writes values by name
//! through [`ShaderUniforms`], and the backend decides where each value ends
//! up. Values persist until they are overwritten, so a draw sees whatever was
//! written last.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";

pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

pub const DIR_LIGHT_DIRECTION: &str = "dirLight.direction";
pub const DIR_LIGHT_AMBIENT: &str = "dirLight.ambient";
pub const DIR_LIGHT_DIFFUSE: &str = "dirLight.diffuse";
pub const DIR_LIGHT_SPECULAR: &str = "dirLight.specular";

pub const SPOT_LIGHT_POSITION: &str = "spotLight.position";
pub const SPOT_LIGHT_DIRECTION: &str = "spotLight.direction";
pub const SPOT_LIGHT_AMBIENT: &str = "spotLight.ambient";
pub const SPOT_LIGHT_DIFFUSE: &str = "spotLight.diffuse";
pub const SPOT_LIGHT_SPECULAR: &str = "spotLight.specular";
pub const SPOT_LIGHT_CONSTANT: &str = "spotLight.constant";
pub const SPOT_LIGHT_LINEAR: &str = "spotLight.linear";
pub const SPOT_LIGHT_QUADRATIC: &str = "spotLight.quadratic";
pub const SPOT_LIGHT_CUT_OFF: &str = "spotLight.cutOff";
pub const SPOT_LIGHT_OUTER_CUT_OFF: &str = "spotLight.outerCutOff";

/// Uniform upload by name.
///
/// Implementations should accept unknown names silently (or log them);
/// writing a uniform is never a reason to fail a frame.
pub trait ShaderUniforms {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);

    /// Point a sampler uniform at a texture slot. `-1` means "no texture".
    fn set_sampler(&mut self, name: &str, slot: i32);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }
}
