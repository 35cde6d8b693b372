//! Ray-triangle intersection (Möller-Trumbore).

use hybrid_rt_math::{Point3, EPSILON};

use crate::Ray;

/// Result of a ray-triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Parameter along the ray.
    pub t: f32,
    /// Barycentric weight of `v1`.
    pub u: f32,
    /// Barycentric weight of `v2`.
    pub v: f32,
}

/// Intersect a ray with triangle `(v0, v1, v2)`.
///
/// Near-parallel rays and degenerate triangles (|det| < ε) miss. Hits at
/// `t <= ε` are rejected so a ray never re-hits the surface it starts on.
#[inline]
pub fn intersect_triangle(ray: &Ray, v0: &Point3, v1: &Point3, v2: &Point3) -> Option<TriangleHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.direction.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = inv_det * s.dot(&p);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * e2.dot(&q);
    if t > EPSILON {
        Some(TriangleHit { t, u, v })
    } else {
        None
    }
}
