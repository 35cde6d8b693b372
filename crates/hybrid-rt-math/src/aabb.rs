//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{Point3, Vec3};

/// Relative growth applied by [`Aabb3::padded`].
const BOX_PADDING: f32 = 1e-5;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Whether nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another box.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        if other.is_empty() {
            return;
        }
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Tight bound of three points.
    pub fn from_triangle(a: &Point3, b: &Point3, c: &Point3) -> Self {
        let mut aabb = Self::empty();
        aabb.include_point(a);
        aabb.include_point(b);
        aabb.include_point(c);
        aabb
    }

    /// Size along each axis. Zero for an empty box.
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        self.max - self.min
    }

    /// Center of the box.
    pub fn centroid(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Index of the axis with the largest extent (0 = x, 1 = y, 2 = z).
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Surface area of the box. Zero for an empty box.
    pub fn surface_area(&self) -> f32 {
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Expand the AABB by a tolerance in all directions.
    pub fn expand(&mut self, tol: f32) {
        self.min.x -= tol;
        self.min.y -= tol;
        self.min.z -= tol;
        self.max.x += tol;
        self.max.y += tol;
        self.max.z += tol;
    }

    /// Copy of the box grown by a few ulps of its largest coordinate.
    ///
    /// Flat boxes (e.g. the bounds of a planar quad) have an empty slab
    /// interval under a strict `exit <= entry` test; padding gives every
    /// axis a nonzero thickness.
    pub fn padded(&self) -> Self {
        if self.is_empty() {
            return *self;
        }
        let scale = self.min.coords.amax().max(self.max.coords.amax()).max(1.0);
        let mut out = *self;
        out.expand(scale * BOX_PADDING);
        out
    }

    /// Whether `p` lies inside or on the boundary of the box.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}
