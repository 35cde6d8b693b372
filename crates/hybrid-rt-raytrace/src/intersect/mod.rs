//! Ray-primitive intersection tests.
//!
//! Both tests always resolve to a definite hit or miss, including for
//! axis-parallel rays and degenerate triangles.

mod aabb;
mod triangle;

pub use aabb::intersect_aabb;
pub use triangle::{intersect_triangle, TriangleHit};
