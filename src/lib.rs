//! desk-scene
//!
//! A small static 3D scene (a desk with a lamp, a wall clock and a potted
//! plant) assembled from a handful of shared primitive meshes. Every object
//! is one primitive placed with its own scale/rotation/position and shaded
//! with a flat colour or a texture plus a named material preset, under one
//! directional light and one spotlight.
//!
//! The scene code only talks to three collaborator traits (named shader
//! uniforms, primitive meshes, texture storage); [`render::SceneRenderer`]
//! implements them with wgpu.
//!
//! High-level modules
//! - `bridge`: turns transforms, colours, textures and materials into uniform writes
//! - `camera`: fly camera, projection and controller
//! - `config`: window/asset/camera settings with environment overrides
//! - `context`: window, surface and GPU device
//! - `data_structures`: materials, meshes, textures and transforms
//! - `flow`: the winit application loop
//! - `pipelines`: the render pipeline and its layouts
//! - `render`: wgpu implementation of the collaborator traits
//! - `resources`: texture loading and procedural primitive geometry
//! - `scene`: the desk scene itself
//! - `shader`: uniform names and the [`shader::ShaderUniforms`] trait
//!

pub mod bridge;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
#[cfg(feature = "integration-tests")]
pub mod headless;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shader;

// Re-exports commonly used types for convenience in downstream code.
pub use config::SceneConfig;
pub use data_structures::{
    material::{MaterialTable, ObjectMaterial},
    mesh::ShapeKind,
    transform::Transform,
};
pub use resources::{
    mesh::ShapeMeshes,
    texture::{TextureBackend, TextureHandle, TextureRegistry},
};
pub use scene::{Renderer, SceneManager};
pub use shader::ShaderUniforms;
