//! Ray representation and hit records.

use hybrid_rt_math::{Point3, Vec3};

/// A ray in 3D space defined by origin and direction.
///
/// The direction is used as given; callers that want `t` in world units
/// should pass a unit vector.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    pub direction: Vec3,
    /// Precomputed reciprocal of direction components for slab tests.
    inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        // A zero component yields a signed infinity, which the slab test relies on.
        let inv_direction = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        Self {
            origin,
            direction,
            inv_direction,
        }
    }

    /// Componentwise reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> &Vec3 {
        &self.inv_direction
    }
}

/// Result of a nearest-hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Index of the mesh that was hit.
    pub mesh: usize,
    /// Index of the triangle within that mesh.
    pub triangle: usize,
    /// Parameter along the ray where the intersection occurs.
    pub t: f32,
    /// Vertex normals blended with weights (w, u, v), unit length.
    pub normal: Vec3,
    /// Barycentric weight of the triangle's second vertex.
    pub u: f32,
    /// Barycentric weight of the triangle's third vertex.
    pub v: f32,
}

impl HitRecord {
    /// Barycentric weight of the first vertex, `1 - u - v`.
    #[inline]
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }
}
