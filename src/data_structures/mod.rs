//! Scene data structures: materials, meshes, textures and transforms.
//!
//! - `material` holds the named material presets and their lookup table
//! - `mesh` contains the primitive shape kinds, vertex format and GPU mesh
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `transform` holds the per-object scale/rotation/position

pub mod material;
pub mod mesh;
pub mod texture;
pub mod transform;
