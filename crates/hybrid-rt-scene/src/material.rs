//! Surface materials.

use hybrid_rt_math::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

/// Surface description consumed by the shading evaluator.
///
/// Texture references are optional; `None` (or an index past the end of the
/// scene's texture table) means the texture is not applied. Scene files may
/// also write a negative index for "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base color in linear RGB.
    pub albedo: Vec3,
    /// Roughness in [0, 1]. Lower values receive a stronger gloss term.
    pub roughness: f32,
    /// Metallic factor. Carried through but not used by the single-bounce shader.
    pub metallic: f32,
    /// Index of the texture modulating `albedo`.
    #[serde(deserialize_with = "texture_index")]
    pub albedo_texture: Option<usize>,
    /// Index of the tangent-free normal map replacing the interpolated normal.
    #[serde(deserialize_with = "texture_index")]
    pub normal_texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::new(1.0, 1.0, 1.0),
            roughness: 1.0,
            metallic: 0.0,
            albedo_texture: None,
            normal_texture: None,
        }
    }
}

impl Material {
    /// Untextured material with the given albedo and roughness.
    pub fn diffuse(albedo: Vec3, roughness: f32) -> Self {
        Self {
            albedo,
            roughness,
            ..Self::default()
        }
    }
}

/// Texture index from a scene file: negative integers and `null` mean none.
fn texture_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let index = Option::<i64>::deserialize(deserializer)?;
    Ok(index.and_then(|i| usize::try_from(i).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_texture_index_is_none() {
        let json = r#"{"albedo_texture": -1, "normal_texture": 2}"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert_eq!(material.albedo_texture, None);
        assert_eq!(material.normal_texture, Some(2));
        assert_eq!(material.roughness, 1.0);
    }

    #[test]
    fn test_null_and_missing_texture_index() {
        let material: Material = serde_json::from_str(r#"{"normal_texture": null}"#).unwrap();
        assert_eq!(material.albedo_texture, None);
        assert_eq!(material.normal_texture, None);
    }

    #[test]
    fn test_texture_index_roundtrip() {
        let material = Material {
            albedo_texture: Some(3),
            ..Material::default()
        };
        let json = serde_json::to_string(&material).unwrap();
        let back: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(back, material);
    }
}
