//! Named material presets.
//!
//! Materials are plain lighting parameters (no textures). The table is filled
//! once while preparing the scene and afterwards only read.

use cgmath::Vector3;

/// Lighting parameters of one named material preset.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMaterial {
    pub tag: String,
    pub ambient_color: Vector3<f32>,
    pub ambient_strength: f32,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl ObjectMaterial {
    pub fn new(
        tag: &str,
        ambient_color: [f32; 3],
        ambient_strength: f32,
        diffuse_color: [f32; 3],
        specular_color: [f32; 3],
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            ambient_color: ambient_color.into(),
            ambient_strength,
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        }
    }
}

/// Ordered list of material presets, looked up linearly by tag.
#[derive(Clone, Debug, Default)]
pub struct MaterialTable {
    materials: Vec<ObjectMaterial>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five presets used by the desk scene.
    pub fn scene_defaults() -> Self {
        let mut table = Self::new();
        table.push(ObjectMaterial::new(
            "marble",
            [0.2, 0.2, 0.2],
            0.4,
            [0.9, 0.9, 0.9],
            [0.3, 0.3, 0.3],
            16.0,
        ));
        table.push(ObjectMaterial::new(
            "gold",
            [0.25, 0.20, 0.07],
            0.3,
            [0.8, 0.65, 0.25],
            [0.65, 0.55, 0.35],
            51.2,
        ));
        table.push(ObjectMaterial::new(
            "granite",
            [0.2, 0.2, 0.2],
            0.35,
            [0.6, 0.6, 0.6],
            [0.2, 0.2, 0.2],
            8.0,
        ));
        table.push(ObjectMaterial::new(
            "wall",
            [1.0, 1.0, 1.0],
            0.5,
            [1.0, 1.0, 1.0],
            [0.1, 0.1, 0.1],
            1.0,
        ));
        // low shine
        table.push(ObjectMaterial::new(
            "lamp",
            [1.0, 1.0, 1.0],
            0.5,
            [1.0, 1.0, 1.0],
            [0.2, 0.2, 0.2],
            2.0,
        ));
        table
    }

    pub fn push(&mut self, material: ObjectMaterial) {
        if self.find_material(&material.tag).is_some() {
            log::warn!(
                "Material tag {} is already registered; lookups will keep returning the first one.",
                material.tag
            );
        }
        self.materials.push(material);
    }

    pub fn find_material(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectMaterial> {
        self.materials.iter()
    }
}

impl Extend<ObjectMaterial> for MaterialTable {
    fn extend<I: IntoIterator<Item = ObjectMaterial>>(&mut self, iter: I) {
        for material in iter {
            self.push(material);
        }
    }
}

impl IntoIterator for MaterialTable {
    type Item = ObjectMaterial;
    type IntoIter = std::vec::IntoIter<ObjectMaterial>;

    fn into_iter(self) -> Self::IntoIter {
        self.materials.into_iter()
    }
}
