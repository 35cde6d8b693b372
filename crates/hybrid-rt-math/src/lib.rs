#![warn(missing_docs)]

//! Math types for the hybrid raytracer.
//!
//! Thin wrappers around nalgebra providing the single-precision types used
//! throughout the renderer: points, vectors, axis-aligned boxes and the
//! tolerance constants shared by the intersection code.

mod aabb;

pub use aabb::Aabb3;

use nalgebra::{Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f32>;

/// A vector in 3D space. Also used for linear RGB colors.
pub type Vec3 = Vector3<f32>;

/// A 2D vector, used for texture coordinates.
pub type Vec2 = Vector2<f32>;

/// Determinant and distance epsilon for ray-triangle tests.
pub const EPSILON: f32 = 1e-6;

/// Normalize `v`, returning the zero vector when `v` has zero length.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len = v.norm();
    if len > 0.0 {
        v / len
    } else {
        Vec3::zeros()
    }
}

/// Blend three values with barycentric weights `(w, u, v)` where `w = 1 - u - v`.
#[inline]
pub fn barycentric_blend(a: Vec3, b: Vec3, c: Vec3, u: f32, v: f32) -> Vec3 {
    let w = 1.0 - u - v;
    a * w + b * u + c * v
}
