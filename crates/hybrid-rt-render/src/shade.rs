//! Single-light shading of ray hits.

use hybrid_rt_math::{normalize_or_zero, Vec2, Vec3};
use hybrid_rt_raytrace::HitRecord;
use hybrid_rt_scene::{sample_texture, Material, Scene};

/// Lighting constants shared by every pixel of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingParams {
    /// Unit direction the light travels.
    pub light_direction: Vec3,
    /// Constant ambient term.
    pub ambient: f32,
    /// Scale of the additive `(1 - roughness)` gloss term.
    pub gloss_strength: f32,
    /// Color returned on a miss.
    pub background: Vec3,
}

/// Linear color for a nearest-hit result. Not clamped.
///
/// On a hit the albedo is modulated by the material's albedo texture and the
/// interpolated normal is replaced by a decoded normal-map sample when the
/// material has one. Diffuse is `max(0, n · -L)`. A triangle whose material
/// index is out of range shades with [`Material::default`].
pub fn shade(scene: &Scene, hit: Option<&HitRecord>, params: &ShadingParams) -> Vec3 {
    let Some(hit) = hit else {
        return params.background;
    };

    let triangle = scene
        .meshes
        .get(hit.mesh)
        .and_then(|mesh| mesh.triangle_vertices(hit.triangle).map(|v| (mesh, v)));
    let fallback = Material::default();
    let (material, uv) = match triangle {
        Some((mesh, [a, b, c])) => {
            let material = mesh
                .triangles
                .get(hit.triangle)
                .and_then(|tri| scene.material(tri.material))
                .unwrap_or(&fallback);
            let uv = a.uv * hit.w() + b.uv * hit.u + c.uv * hit.v;
            (material, uv)
        }
        None => (&fallback, Vec2::zeros()),
    };

    let albedo = material
        .albedo
        .component_mul(&sample_texture(scene.texture(material.albedo_texture), uv.x, uv.y));

    let mut normal = hit.normal;
    if let Some(texture) = scene.texture(material.normal_texture) {
        let encoded = texture.sample(uv.x, uv.y);
        normal = normalize_or_zero(encoded * 2.0 - Vec3::repeat(1.0));
    }

    let diffuse = normal.dot(&-params.light_direction).max(0.0);
    let gloss = params.gloss_strength * (1.0 - material.roughness);
    albedo * (params.ambient + diffuse) + Vec3::repeat(gloss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hybrid_rt_math::Point3;
    use hybrid_rt_scene::{Mesh, Texture, Triangle, Vertex};

    fn params() -> ShadingParams {
        ShadingParams {
            light_direction: Vec3::new(0.0, 0.0, 1.0),
            ambient: 0.1,
            gloss_strength: 0.04,
            background: Vec3::new(0.03, 0.03, 0.05),
        }
    }

    fn facing_scene(material: Material, textures: Vec<Texture>) -> Scene {
        let n = Vec3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), n, Vec2::new(0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), n, Vec2::new(1.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), n, Vec2::new(0.0, 1.0)),
        ];
        let mesh = Mesh::new(vertices, vec![Triangle::new(0, 1, 2, 0)]);
        Scene::new(vec![mesh], textures, vec![material])
    }

    fn hit_at(u: f32, v: f32) -> HitRecord {
        HitRecord {
            mesh: 0,
            triangle: 0,
            t: 1.0,
            normal: Vec3::new(0.0, 0.0, -1.0),
            u,
            v,
        }
    }

    #[test]
    fn test_miss_is_background() {
        let scene = facing_scene(Material::default(), vec![]);
        assert_eq!(shade(&scene, None, &params()), params().background);
    }

    #[test]
    fn test_lambert_plus_gloss() {
        let material = Material::diffuse(Vec3::new(0.5, 0.25, 1.0), 0.5);
        let scene = facing_scene(material, vec![]);
        let color = shade(&scene, Some(&hit_at(0.2, 0.2)), &params());
        // Normal faces the light head on: diffuse = 1.
        let gloss = 0.04 * 0.5;
        assert_relative_eq!(color.x, 0.5 * 1.1 + gloss, epsilon = 1e-6);
        assert_relative_eq!(color.y, 0.25 * 1.1 + gloss, epsilon = 1e-6);
        assert_relative_eq!(color.z, 1.0 * 1.1 + gloss, epsilon = 1e-6);
    }

    #[test]
    fn test_back_facing_gets_ambient_only() {
        let scene = facing_scene(Material::default(), vec![]);
        let mut hit = hit_at(0.2, 0.2);
        hit.normal = Vec3::new(0.0, 0.0, 1.0);
        let color = shade(&scene, Some(&hit), &params());
        assert_relative_eq!(color, Vec3::repeat(0.1), epsilon = 1e-6);
    }

    #[test]
    fn test_albedo_texture_modulates() {
        let material = Material {
            albedo_texture: Some(0),
            ..Material::default()
        };
        let red = Texture::solid(2, 2, [255, 0, 0, 255]);
        let scene = facing_scene(material, vec![red]);
        let color = shade(&scene, Some(&hit_at(0.3, 0.3)), &params());
        assert_relative_eq!(color.x, 1.1, epsilon = 1e-6);
        assert_relative_eq!(color.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(color.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_texture_uses_material_albedo() {
        let material = Material {
            albedo: Vec3::new(0.5, 0.5, 0.5),
            albedo_texture: Some(7),
            normal_texture: Some(9),
            ..Material::default()
        };
        let scene = facing_scene(material, vec![]);
        let color = shade(&scene, Some(&hit_at(0.3, 0.3)), &params());
        assert_relative_eq!(color, Vec3::repeat(0.55), epsilon = 1e-6);
    }

    #[test]
    fn test_normal_map_replaces_normal() {
        let material = Material {
            normal_texture: Some(0),
            ..Material::default()
        };
        // Encodes (0, 0, 1): points away from a light travelling +z.
        let away = Texture::solid(1, 1, [128, 128, 255, 255]);
        let scene = facing_scene(material, vec![away]);
        let color = shade(&scene, Some(&hit_at(0.3, 0.3)), &params());
        assert_relative_eq!(color, Vec3::repeat(0.1), epsilon = 1e-6);
    }

    #[test]
    fn test_uv_interpolation_picks_texel() {
        let material = Material {
            albedo_texture: Some(0),
            ..Material::default()
        };
        // First column black, the rest white.
        let texture = Texture::new(
            3,
            1,
            vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 255, 255, 255],
        );
        let scene = facing_scene(material, vec![texture]);
        let near_origin = shade(&scene, Some(&hit_at(0.0, 0.0)), &params());
        let near_x = shade(&scene, Some(&hit_at(0.6, 0.0)), &params());
        assert_relative_eq!(near_origin, Vec3::zeros(), epsilon = 1e-6);
        assert_relative_eq!(near_x, Vec3::repeat(1.1), epsilon = 1e-6);
    }

    #[test]
    fn test_bad_material_index_falls_back() {
        let mut scene = facing_scene(Material::diffuse(Vec3::new(1.0, 0.0, 0.0), 1.0), vec![]);
        scene.meshes[0].triangles[0].material = 42;
        let color = shade(&scene, Some(&hit_at(0.2, 0.2)), &params());
        assert_relative_eq!(color, Vec3::repeat(1.1), epsilon = 1e-6);
    }
}
