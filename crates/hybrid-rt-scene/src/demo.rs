//! Procedural demo scene: a textured, normal-mapped unit quad.

use std::f32::consts::TAU;

use hybrid_rt_math::{normalize_or_zero, Point3, Vec2, Vec3};

use crate::{Material, Mesh, Scene, Texture, Triangle, Vertex};

/// Side length of both demo textures.
pub const DEMO_TEXTURE_SIZE: u32 = 256;

const CHECKER_CELL: u32 = 32;

/// Build the demo scene.
///
/// A quad spanning (-1,-1)..(1,1) at z = 0 with +z normals, one material
/// with an albedo checkerboard (texture 0) and a sinusoidal normal map
/// (texture 1).
pub fn demo_scene() -> Scene {
    let n = Vec3::z();
    let quad = Mesh::new(
        vec![
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), n, Vec2::new(0.0, 0.0)),
            Vertex::new(Point3::new(1.0, -1.0, 0.0), n, Vec2::new(1.0, 0.0)),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), n, Vec2::new(1.0, 1.0)),
            Vertex::new(Point3::new(-1.0, 1.0, 0.0), n, Vec2::new(0.0, 1.0)),
        ],
        vec![Triangle::new(0, 1, 2, 0), Triangle::new(0, 2, 3, 0)],
    );

    let material = Material {
        albedo: Vec3::new(1.0, 1.0, 1.0),
        roughness: 0.2,
        metallic: 0.0,
        albedo_texture: Some(0),
        normal_texture: Some(1),
    };

    let (albedo, normal) = demo_textures(DEMO_TEXTURE_SIZE);
    Scene::new(vec![quad], vec![albedo, normal], vec![material])
}

/// Generate the checkerboard albedo and the matching normal map.
fn demo_textures(size: u32) -> (Texture, Texture) {
    let len = size as usize * size as usize * 4;
    let mut albedo = Vec::with_capacity(len);
    let mut normal = Vec::with_capacity(len);
    let denom = size.saturating_sub(1).max(1) as f32;

    for y in 0..size {
        for x in 0..size {
            let u = x as f32 / denom;
            let v = y as f32 / denom;

            let checker = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) & 1 == 1;
            let c = if checker {
                Vec3::new(0.8, 0.2, 0.2)
            } else {
                Vec3::new(0.2, 0.8, 0.2)
            };
            albedo.extend_from_slice(&[
                to_u8(c.x * (0.5 + 0.5 * u)),
                to_u8(c.y * (0.5 + 0.5 * v)),
                to_u8(c.z),
                255,
            ]);

            let n = normalize_or_zero(Vec3::new(
                (u * TAU).sin() * 0.4,
                (v * TAU).cos() * 0.4,
                1.0,
            ));
            normal.extend_from_slice(&[
                to_u8(0.5 * (n.x + 1.0)),
                to_u8(0.5 * (n.y + 1.0)),
                to_u8(0.5 * (n.z + 1.0)),
                255,
            ]);
        }
    }

    (
        Texture::new(size, size, albedo),
        Texture::new(size, size, normal),
    )
}

/// Round a [0, 1] channel to 8 bits.
fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_demo_scene_shape() {
        let scene = demo_scene();
        assert!(scene.validate().is_ok());
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(scene.textures.len(), 2);
        for tex in &scene.textures {
            assert!(!tex.is_degenerate());
        }
        let bounds = scene.bounds();
        assert_eq!(bounds.min, Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_checker_alternates() {
        let (albedo, _) = demo_textures(64);
        // Texel (0,0) is in a green cell, texel (37,0) in a red one.
        let a = albedo.sample(0.0, 0.0);
        assert!(a.y > a.x);
        let b = albedo.sample(0.6, 0.0);
        assert!(b.x > b.y);
    }

    #[test]
    fn test_normal_map_decodes_to_unit_vectors() {
        let (_, normal) = demo_textures(16);
        for (u, v) in [(0.0, 0.0), (0.3, 0.6), (0.9, 0.1)] {
            let c = normal.sample(u, v);
            let n = c * 2.0 - Vec3::new(1.0, 1.0, 1.0);
            assert_relative_eq!(n.norm(), 1.0, epsilon = 0.02);
            assert!(n.z > 0.8);
        }
    }
}
