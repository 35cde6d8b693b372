//! The scene container.

use std::path::Path;

use hybrid_rt_math::Aabb3;
use serde::{Deserialize, Serialize};

use crate::{Material, Mesh, Result, SceneError, Texture};

/// Meshes, materials and textures for one render.
///
/// The scene owns all geometry. Acceleration structures borrow it, so it
/// cannot be mutated or dropped while one is alive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Triangle meshes.
    pub meshes: Vec<Mesh>,
    /// Texture table referenced by materials.
    #[serde(default)]
    pub textures: Vec<Texture>,
    /// Material table referenced by triangles.
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Scene {
    /// Create a scene from its parts.
    pub fn new(meshes: Vec<Mesh>, textures: Vec<Texture>, materials: Vec<Material>) -> Self {
        Self {
            meshes,
            textures,
            materials,
        }
    }

    /// Parse a scene from a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Serialize the scene to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load and validate a JSON scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let scene = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            meshes = scene.meshes.len(),
            triangles = scene.triangle_count(),
            "loaded scene"
        );
        Ok(scene)
    }

    /// Check that every triangle references existing vertices.
    ///
    /// Material and texture indices are not checked; out-of-range values
    /// degrade to neutral shading.
    pub fn validate(&self) -> Result<()> {
        for (mesh_idx, mesh) in self.meshes.iter().enumerate() {
            for (tri_idx, tri) in mesh.triangles.iter().enumerate() {
                for &vertex in &tri.indices {
                    if vertex as usize >= mesh.vertices.len() {
                        return Err(SceneError::InvalidReference {
                            mesh: mesh_idx,
                            triangle: tri_idx,
                            vertex,
                            vertex_count: mesh.vertices.len(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Total number of triangles across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles.len()).sum()
    }

    /// Look up a material by index.
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Look up an optional texture reference.
    pub fn texture(&self, index: Option<usize>) -> Option<&Texture> {
        index.and_then(|i| self.textures.get(i))
    }

    /// Bounding box of every vertex in the scene.
    pub fn bounds(&self) -> Aabb3 {
        let mut aabb = Aabb3::empty();
        for mesh in &self.meshes {
            for vertex in &mesh.vertices {
                aabb.include_point(&vertex.position);
            }
        }
        aabb
    }
}
