//! Ray-box slab test.

use hybrid_rt_math::Aabb3;

use crate::Ray;

/// Intersect a ray with an axis-aligned box, restricted to `[t_min, t_max]`.
///
/// Returns the clipped `(entry, exit)` interval, or `None` if it is empty.
/// Zero direction components produce signed infinities in the reciprocal,
/// so axis-parallel rays need no special case.
#[inline]
pub fn intersect_aabb(ray: &Ray, aabb: &Aabb3, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
    let inv = ray.inv_direction();
    let mut t_min = t_min;
    let mut t_max = t_max;

    for axis in 0..3 {
        let mut t0 = (aabb.min[axis] - ray.origin[axis]) * inv[axis];
        let mut t1 = (aabb.max[axis] - ray.origin[axis]) * inv[axis];
        if inv[axis] < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_min {
            t_min = t0;
        }
        if t1 < t_max {
            t_max = t1;
        }
        if t_max <= t_min {
            return None;
        }
    }

    Some((t_min, t_max))
}
