use std::path::Path;

use anyhow::Context;

/**
 * This module contains all logic for loading textures from disk and building
 * the primitive meshes the scene is made of.
 */
pub mod geometry;
pub mod mesh;
pub mod texture;

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
