//! Bounding Volume Hierarchy over every triangle of a scene.
//!
//! Nodes live in a flat array with the root at index 0; children are array
//! indices, with [`INVALID_NODE`] marking an absent child. Leaves reference a
//! contiguous range of a single global permutation of triangle indices, so
//! building never duplicates a triangle.
//!
//! Construction uses either a bucketed Surface Area Heuristic or a centroid
//! median split along the longest axis of the node bounds. The structure
//! borrows the [`Scene`] it was built from, so the scene can be neither
//! mutated nor dropped while the BVH exists.

use hybrid_rt_math::{barycentric_blend, normalize_or_zero, Aabb3, Point3};
use hybrid_rt_scene::Scene;
use serde::{Deserialize, Serialize};

use crate::intersect::{intersect_aabb, intersect_triangle, TriangleHit};
use crate::{BvhError, HitRecord, Ray, Result};

/// Child index meaning "no child".
pub const INVALID_NODE: usize = usize::MAX;

/// Default maximum number of triangles in a leaf.
pub const DEFAULT_MAX_LEAF_SIZE: usize = 4;

const NUM_BUCKETS: usize = 12;
const TRAVERSAL_COST: f32 = 0.125;

/// How node primitive ranges are partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Bucketed SAH along the longest axis; falls back to the median.
    #[default]
    Sah,
    /// Centroid median along the longest axis.
    Median,
    /// No partitioning: a single root leaf holding every triangle.
    Flat,
}

/// Construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvhOptions {
    /// Nodes with at most this many triangles become leaves.
    pub max_leaf_size: usize,
    /// Partitioning strategy.
    pub strategy: SplitStrategy,
}

impl Default for BvhOptions {
    fn default() -> Self {
        Self {
            max_leaf_size: DEFAULT_MAX_LEAF_SIZE,
            strategy: SplitStrategy::Sah,
        }
    }
}

/// A BVH node: a leaf over a triangle range or an internal node with two children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    /// Bounds of every triangle in this subtree.
    pub aabb: Aabb3,
    /// Left child index, or [`INVALID_NODE`] for leaves.
    pub left: usize,
    /// Right child index, or [`INVALID_NODE`] for leaves.
    pub right: usize,
    /// First entry in the triangle permutation (leaves only).
    pub start: usize,
    /// Number of triangles (zero for internal nodes).
    pub count: usize,
}

impl BvhNode {
    fn leaf(aabb: Aabb3, start: usize, count: usize) -> Self {
        Self {
            aabb,
            left: INVALID_NODE,
            right: INVALID_NODE,
            start,
            count,
        }
    }

    fn internal(aabb: Aabb3, left: usize, right: usize) -> Self {
        Self {
            aabb,
            left,
            right,
            start: 0,
            count: 0,
        }
    }

    /// Whether this node holds triangles directly.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }

    /// Child indices of an internal node.
    #[inline]
    pub fn children(&self) -> Option<(usize, usize)> {
        if self.is_leaf() || self.left == INVALID_NODE || self.right == INVALID_NODE {
            None
        } else {
            Some((self.left, self.right))
        }
    }
}

/// Counters collected during one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose bounds the ray entered.
    pub nodes_visited: usize,
    /// Ray-triangle tests performed.
    pub triangle_tests: usize,
}

/// Per-triangle data used during construction.
#[derive(Debug, Clone, Copy)]
struct PrimInfo {
    aabb: Aabb3,
    centroid: Point3,
}

/// Bounding Volume Hierarchy for nearest-hit ray queries.
#[derive(Debug, Clone)]
pub struct Bvh<'s> {
    scene: &'s Scene,
    nodes: Vec<BvhNode>,
    triangle_indices: Vec<usize>,
    /// `(mesh, local triangle)` for each global triangle index.
    locations: Vec<(usize, usize)>,
}

impl<'s> Bvh<'s> {
    /// Build a BVH with default options (SAH, leaves of up to four triangles).
    pub fn build(scene: &'s Scene) -> Result<Self> {
        Self::build_with(scene, &BvhOptions::default())
    }

    /// Build a BVH over every triangle of every mesh in `scene`.
    ///
    /// All storage is reserved up front; if any reservation fails the
    /// partial state is dropped and [`BvhError::OutOfMemory`] is returned.
    pub fn build_with(scene: &'s Scene, options: &BvhOptions) -> Result<Self> {
        let total = scene.triangle_count();

        let mut prims: Vec<PrimInfo> = try_vec_with_capacity(total)?;
        let mut locations: Vec<(usize, usize)> = try_vec_with_capacity(total)?;
        for (mesh_idx, mesh) in scene.meshes.iter().enumerate() {
            for tri_idx in 0..mesh.triangles.len() {
                let [a, b, c] = mesh.triangle_positions(tri_idx).ok_or(
                    BvhError::InvalidTriangle {
                        mesh: mesh_idx,
                        triangle: tri_idx,
                    },
                )?;
                let aabb = Aabb3::from_triangle(&a, &b, &c);
                prims.push(PrimInfo {
                    aabb,
                    centroid: aabb.centroid(),
                });
                locations.push((mesh_idx, tri_idx));
            }
        }

        let mut triangle_indices: Vec<usize> = try_vec_with_capacity(total)?;
        triangle_indices.extend(0..total);

        // A binary tree with at most `total` non-empty leaves has at most 2n - 1 nodes.
        let max_nodes = match (options.strategy, total) {
            (_, 0) => 0,
            (SplitStrategy::Flat, _) => 1,
            (_, n) => 2 * n - 1,
        };
        let mut nodes: Vec<BvhNode> = try_vec_with_capacity(max_nodes)?;

        if total > 0 {
            let mut builder = Builder {
                prims: &prims,
                indices: &mut triangle_indices,
                nodes: &mut nodes,
                max_leaf_size: options.max_leaf_size.max(1),
                strategy: options.strategy,
            };
            builder.build_range(0, total);
        }

        let bvh = Self {
            scene,
            nodes,
            triangle_indices,
            locations,
        };

        tracing::debug!(
            triangles = total,
            nodes = bvh.node_count(),
            leaves = bvh.leaf_count(),
            depth = bvh.depth(),
            strategy = ?options.strategy,
            "built bvh"
        );

        Ok(bvh)
    }

    /// Return the closest hit strictly inside `(t_min, t_max)`, if any.
    pub fn trace(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        self.trace_with_stats(ray, t_min, t_max).0
    }

    /// Like [`trace`](Self::trace), also reporting how much work was done.
    pub fn trace_with_stats(
        &self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
    ) -> (Option<HitRecord>, TraversalStats) {
        let mut stats = TraversalStats::default();

        let Some(root) = self.nodes.first() else {
            return (None, stats);
        };
        if intersect_aabb(ray, &root.aabb, t_min, t_max).is_none() {
            return (None, stats);
        }

        let mut closest: Option<(usize, TriangleHit)> = None;
        let mut closest_t = t_max;
        self.trace_node(0, ray, t_min, &mut closest, &mut closest_t, &mut stats);

        let hit = closest.and_then(|(global, hit)| self.resolve_hit(global, hit));
        (hit, stats)
    }

    /// Visit a node whose bounds the ray is already known to enter.
    fn trace_node(
        &self,
        node_idx: usize,
        ray: &Ray,
        t_min: f32,
        closest: &mut Option<(usize, TriangleHit)>,
        closest_t: &mut f32,
        stats: &mut TraversalStats,
    ) {
        stats.nodes_visited += 1;
        let node = &self.nodes[node_idx];

        match node.children() {
            None => {
                for &global in &self.triangle_indices[node.start..node.start + node.count] {
                    let Some([v0, v1, v2]) = self.positions(global) else {
                        continue;
                    };
                    stats.triangle_tests += 1;
                    if let Some(hit) = intersect_triangle(ray, &v0, &v1, &v2) {
                        // Strict comparison: first-found wins ties.
                        if hit.t > t_min && hit.t < *closest_t {
                            *closest_t = hit.t;
                            *closest = Some((global, hit));
                        }
                    }
                }
            }
            Some((left, right)) => {
                let left_t = intersect_aabb(ray, &self.nodes[left].aabb, t_min, *closest_t)
                    .map(|(t, _)| t);
                let right_t = intersect_aabb(ray, &self.nodes[right].aabb, t_min, *closest_t)
                    .map(|(t, _)| t);

                // Nearer child first; the second is re-checked against the
                // updated best distance before descending.
                let order = match (left_t, right_t) {
                    (Some(lt), Some(rt)) if rt < lt => [Some((right, rt)), Some((left, lt))],
                    (lt, rt) => [lt.map(|t| (left, t)), rt.map(|t| (right, t))],
                };
                for (child, entry) in order.into_iter().flatten() {
                    if entry < *closest_t {
                        self.trace_node(child, ray, t_min, closest, closest_t, stats);
                    }
                }
            }
        }
    }

    /// Turn a winning triangle test into a full hit record.
    fn resolve_hit(&self, global: usize, hit: TriangleHit) -> Option<HitRecord> {
        let (mesh_idx, tri_idx) = self.locations[global];
        let [a, b, c] = self.scene.meshes[mesh_idx].triangle_vertices(tri_idx)?;
        let normal = normalize_or_zero(barycentric_blend(a.normal, b.normal, c.normal, hit.u, hit.v));
        Some(HitRecord {
            mesh: mesh_idx,
            triangle: tri_idx,
            t: hit.t,
            normal,
            u: hit.u,
            v: hit.v,
        })
    }

    fn positions(&self, global: usize) -> Option<[Point3; 3]> {
        let (mesh_idx, tri_idx) = self.locations[global];
        self.scene.meshes[mesh_idx].triangle_positions(tri_idx)
    }

    /// The scene this structure was built from.
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    /// The flat node array; the root is at index 0.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The global triangle permutation referenced by leaf ranges.
    pub fn triangle_indices(&self) -> &[usize] {
        &self.triangle_indices
    }

    /// `(mesh, local triangle)` for a global triangle index.
    pub fn triangle_location(&self, global: usize) -> Option<(usize, usize)> {
        self.locations.get(global).copied()
    }

    /// Whether the scene contained no triangles.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounds of the whole scene, if it has any triangles.
    pub fn root_bounds(&self) -> Option<Aabb3> {
        self.nodes.first().map(|n| n.aabb)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of levels from the root to the deepest leaf (0 when empty).
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some((left, right)) = self.nodes[idx].children() {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }
}

/// Allocate an empty vector with exactly `capacity` slots, or report OOM.
fn try_vec_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
        .map_err(|_| BvhError::OutOfMemory)?;
    Ok(v)
}

/// Whether a centroid spread is too small to partition.
fn is_degenerate(spread: f32, magnitude: f32) -> bool {
    spread <= f32::EPSILON * magnitude.abs().max(1.0)
}

/// Recursive top-down construction over a range of the permutation.
struct Builder<'a> {
    prims: &'a [PrimInfo],
    indices: &'a mut [usize],
    nodes: &'a mut Vec<BvhNode>,
    max_leaf_size: usize,
    strategy: SplitStrategy,
}

impl Builder<'_> {
    /// Build the subtree for `indices[start..end]`, returning its node index.
    fn build_range(&mut self, start: usize, end: usize) -> usize {
        let mut bounds = Aabb3::empty();
        for &i in &self.indices[start..end] {
            bounds.include_aabb(&self.prims[i].aabb);
        }

        let idx = self.nodes.len();
        let count = end - start;
        self.nodes.push(BvhNode::leaf(bounds.padded(), start, count));

        if count <= self.max_leaf_size || self.strategy == SplitStrategy::Flat {
            return idx;
        }

        let Some(mid) = self.split(start, end, &bounds) else {
            return idx;
        };

        let left = self.build_range(start, mid);
        let right = self.build_range(mid, end);
        self.nodes[idx] = BvhNode::internal(bounds.padded(), left, right);
        idx
    }

    /// Partition `indices[start..end]`, returning the split point, or `None`
    /// when no useful split exists.
    fn split(&mut self, start: usize, end: usize, bounds: &Aabb3) -> Option<usize> {
        let mut centroid_bounds = Aabb3::empty();
        for &i in &self.indices[start..end] {
            centroid_bounds.include_point(&self.prims[i].centroid);
        }

        // Longest axis of the node, unless every centroid coincides along it.
        let spread = centroid_bounds.extent();
        let mut axis = bounds.longest_axis();
        if is_degenerate(spread[axis], centroid_bounds.max[axis]) {
            axis = centroid_bounds.longest_axis();
            if is_degenerate(spread[axis], centroid_bounds.max[axis]) {
                return None;
            }
        }
        let (c_min, c_max) = (centroid_bounds.min[axis], centroid_bounds.max[axis]);

        match self.strategy {
            SplitStrategy::Sah => self.split_sah(start, end, axis, c_min, c_max, bounds),
            SplitStrategy::Median => Some(self.split_median(start, end, axis)),
            SplitStrategy::Flat => None,
        }
    }

    fn split_median(&mut self, start: usize, end: usize, axis: usize) -> usize {
        let prims = self.prims;
        let half = (end - start) / 2;
        self.indices[start..end].select_nth_unstable_by(half, |&a, &b| {
            prims[a].centroid[axis]
                .total_cmp(&prims[b].centroid[axis])
                .then(a.cmp(&b))
        });
        start + half
    }

    fn split_sah(
        &mut self,
        start: usize,
        end: usize,
        axis: usize,
        c_min: f32,
        c_max: f32,
        bounds: &Aabb3,
    ) -> Option<usize> {
        let count = end - start;
        let scale = NUM_BUCKETS as f32 / (c_max - c_min);
        let bucket_of = |c: f32| (((c - c_min) * scale) as usize).min(NUM_BUCKETS - 1);

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];
        for &i in &self.indices[start..end] {
            let b = bucket_of(self.prims[i].centroid[axis]);
            bucket_counts[b] += 1;
            bucket_bounds[b].include_aabb(&self.prims[i].aabb);
        }

        let total_area = bounds.surface_area();
        let mut best_cost = f32::INFINITY;
        let mut best_split = 0;

        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for b in 0..split {
                left_count += bucket_counts[b];
                left_bounds.include_aabb(&bucket_bounds[b]);
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for b in split..NUM_BUCKETS {
                right_count += bucket_counts[b];
                right_bounds.include_aabb(&bucket_bounds[b]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = if total_area > 0.0 {
                TRAVERSAL_COST
                    + left_bounds.surface_area() / total_area * left_count as f32
                    + right_bounds.surface_area() / total_area * right_count as f32
            } else {
                TRAVERSAL_COST + count as f32 / 2.0
            };

            if cost < best_cost {
                best_cost = cost;
                best_split = split;
            }
        }

        if best_split == 0 {
            return Some(self.split_median(start, end, axis));
        }
        // Splitting costs more than intersecting everything here.
        if best_cost >= count as f32 {
            return None;
        }

        let prims = self.prims;
        let range = &mut self.indices[start..end];
        let mut left = 0;
        let mut right = range.len();
        while left < right {
            if bucket_of(prims[range[left]].centroid[axis]) < best_split {
                left += 1;
            } else {
                right -= 1;
                range.swap(left, right);
            }
        }

        if left == 0 || left == count {
            Some(self.split_median(start, end, axis))
        } else {
            Some(start + left)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hybrid_rt_math::{Vec2, Vec3};
    use hybrid_rt_scene::{demo_scene, Mesh, Triangle, Vertex};

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Point3::new(x, y, z), Vec3::z(), Vec2::new(x, y))
    }

    /// Two meshes of small triangles on a bumpy grid, 2 * n * n * 2 triangles.
    fn grid_scene(n: usize) -> Scene {
        let mut meshes = Vec::new();
        for m in 0..2 {
            let mut vertices = Vec::new();
            let mut triangles = Vec::new();
            for j in 0..n {
                for i in 0..n {
                    let x = i as f32 + m as f32 * n as f32;
                    let y = j as f32;
                    let z = ((i * 7 + j * 3) % 5) as f32 * 0.25;
                    let base = vertices.len() as u32;
                    vertices.push(vertex(x, y, z));
                    vertices.push(vertex(x + 1.0, y, z));
                    vertices.push(vertex(x + 1.0, y + 1.0, z));
                    vertices.push(vertex(x, y + 1.0, z));
                    triangles.push(Triangle::new(base, base + 1, base + 2, 0));
                    triangles.push(Triangle::new(base, base + 2, base + 3, 0));
                }
            }
            meshes.push(Mesh::new(vertices, triangles));
        }
        Scene::new(meshes, vec![], vec![])
    }

    /// Two parallel triangles covering (0.2, 0.2): one at z = 2, one at z = 1.
    fn stacked_scene() -> Scene {
        let far = Mesh::new(
            vec![vertex(0.0, 0.0, 2.0), vertex(1.0, 0.0, 2.0), vertex(0.0, 1.0, 2.0)],
            vec![Triangle::new(0, 1, 2, 0)],
        );
        let near = Mesh::new(
            vec![vertex(0.0, 0.0, 1.0), vertex(1.0, 0.0, 1.0), vertex(0.0, 1.0, 1.0)],
            vec![Triangle::new(0, 1, 2, 0)],
        );
        Scene::new(vec![far, near], vec![], vec![])
    }

    fn sample_rays(scene: &Scene) -> Vec<Ray> {
        let bounds = scene.bounds();
        let mut rays = Vec::new();
        for j in 0..17 {
            for i in 0..23 {
                let x = bounds.min.x - 0.5 + (bounds.max.x - bounds.min.x + 1.0) * (i as f32 + 0.37) / 23.0;
                let y = bounds.min.y - 0.5 + (bounds.max.y - bounds.min.y + 1.0) * (j as f32 + 0.61) / 17.0;
                let dir = Vec3::new(0.03 * (i as f32 - 11.0), 0.02 * (j as f32 - 8.0), 1.0).normalize();
                rays.push(Ray::new(Point3::new(x, y, -5.0), dir));
            }
        }
        rays
    }

    fn check_invariants(bvh: &Bvh) {
        let total = bvh.scene().triangle_count();

        let mut seen = bvh.triangle_indices().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..total).collect::<Vec<_>>());

        let mut covered = 0;
        for node in bvh.nodes() {
            if node.is_leaf() {
                assert_eq!(node.left, INVALID_NODE);
                assert_eq!(node.right, INVALID_NODE);
                covered += node.count;
                for &global in &bvh.triangle_indices()[node.start..node.start + node.count] {
                    let (m, t) = bvh.triangle_location(global).unwrap();
                    for p in bvh.scene().meshes[m].triangle_positions(t).unwrap() {
                        assert!(node.aabb.contains(&p));
                    }
                }
            } else {
                assert_eq!(node.count, 0);
                let (l, r) = node.children().unwrap();
                assert!(l < bvh.node_count() && r < bvh.node_count());
                for child in [l, r] {
                    let c = &bvh.nodes()[child].aabb;
                    assert!(node.aabb.contains(&c.min) && node.aabb.contains(&c.max));
                }
            }
        }
        assert_eq!(covered, total);
    }

    #[test]
    fn test_bvh_build_splits() {
        let scene = grid_scene(6);
        let bvh = Bvh::build(&scene).unwrap();
        assert!(bvh.node_count() > 1);
        assert!(bvh.depth() > 1);
        check_invariants(&bvh);

        let median = Bvh::build_with(
            &scene,
            &BvhOptions {
                strategy: SplitStrategy::Median,
                ..BvhOptions::default()
            },
        )
        .unwrap();
        assert!(median.node_count() > 1);
        for node in median.nodes().iter().filter(|n| n.is_leaf()) {
            assert!(node.count <= DEFAULT_MAX_LEAF_SIZE);
        }
        check_invariants(&median);
    }

    #[test]
    fn test_bvh_flat_single_leaf() {
        let scene = grid_scene(3);
        let bvh = Bvh::build_with(
            &scene,
            &BvhOptions {
                strategy: SplitStrategy::Flat,
                ..BvhOptions::default()
            },
        )
        .unwrap();
        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.leaf_count(), 1);
        assert_eq!(bvh.nodes()[0].count, scene.triangle_count());
        check_invariants(&bvh);
    }

    #[test]
    fn test_bvh_empty_scene() {
        let scene = Scene::default();
        let bvh = Bvh::build(&scene).unwrap();
        assert!(bvh.is_empty());
        assert_eq!(bvh.depth(), 0);
        assert!(bvh.root_bounds().is_none());
        let ray = Ray::new(Point3::origin(), Vec3::z());
        assert!(bvh.trace(&ray, 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_bvh_invalid_triangle() {
        let mesh = Mesh::new(vec![vertex(0.0, 0.0, 0.0)], vec![Triangle::new(0, 1, 2, 0)]);
        let scene = Scene::new(vec![mesh], vec![], vec![]);
        assert_eq!(
            Bvh::build(&scene).unwrap_err(),
            BvhError::InvalidTriangle {
                mesh: 0,
                triangle: 0
            }
        );
    }

    #[test]
    fn test_out_of_memory() {
        assert_eq!(
            try_vec_with_capacity::<BvhNode>(usize::MAX).unwrap_err(),
            BvhError::OutOfMemory
        );
    }

    #[test]
    fn test_trace_demo_quad() {
        let scene = demo_scene();
        let bvh = Bvh::build(&scene).unwrap();
        let ray = Ray::new(Point3::new(0.25, -0.5, -3.0), Vec3::z());
        let hit = bvh.trace(&ray, 1e-3, f32::INFINITY).unwrap();
        assert_eq!(hit.mesh, 0);
        assert_eq!(hit.triangle, 0);
        assert_relative_eq!(hit.t, 3.0, epsilon = 1e-5);
        assert_relative_eq!(hit.normal, Vec3::z(), epsilon = 1e-6);
        assert!(hit.u >= 0.0 && hit.v >= 0.0 && hit.w() >= -1e-6);
    }

    #[test]
    fn test_occlusion_ordering() {
        let scene = stacked_scene();
        for max_leaf_size in [1, 4] {
            let options = BvhOptions {
                max_leaf_size,
                strategy: SplitStrategy::Median,
            };
            let bvh = Bvh::build_with(&scene, &options).unwrap();
            let ray = Ray::new(Point3::new(0.2, 0.2, -1.0), Vec3::z());
            let hit = bvh.trace(&ray, 1e-3, f32::INFINITY).unwrap();
            assert_eq!(hit.mesh, 1);
            assert_relative_eq!(hit.t, 2.0, epsilon = 1e-5);

            // From between the two, looking forward, only the far one is visible.
            let ray = Ray::new(Point3::new(0.2, 0.2, 1.5), Vec3::z());
            let hit = bvh.trace(&ray, 1e-3, f32::INFINITY).unwrap();
            assert_eq!(hit.mesh, 0);
            assert_relative_eq!(hit.t, 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_window_is_exclusive() {
        let scene = stacked_scene();
        let bvh = Bvh::build(&scene).unwrap();
        let ray = Ray::new(Point3::new(0.2, 0.2, -1.0), Vec3::z());
        // Upper bound below the near hit: nothing.
        assert!(bvh.trace(&ray, 1e-3, 1.5).is_none());
        // Lower bound past the near hit: the far one.
        let hit = bvh.trace(&ray, 2.5, f32::INFINITY).unwrap();
        assert_eq!(hit.mesh, 0);
    }

    #[test]
    fn test_pruning_skips_triangle_tests() {
        let scene = grid_scene(4);
        let bvh = Bvh::build(&scene).unwrap();
        let ray = Ray::new(Point3::new(100.0, 100.0, -5.0), Vec3::z());
        let (hit, stats) = bvh.trace_with_stats(&ray, 1e-3, f32::INFINITY);
        assert!(hit.is_none());
        assert_eq!(stats, TraversalStats::default());

        // Pointing away from the scene.
        let ray = Ray::new(Point3::new(1.5, 1.5, -5.0), -Vec3::z());
        let (hit, stats) = bvh.trace_with_stats(&ray, 1e-3, f32::INFINITY);
        assert!(hit.is_none());
        assert_eq!(stats.triangle_tests, 0);
    }

    #[test]
    fn test_hierarchy_tests_fewer_triangles() {
        let scene = grid_scene(8);
        let sah = Bvh::build(&scene).unwrap();
        let ray = Ray::new(Point3::new(3.3, 4.6, -5.0), Vec3::z());
        let (hit, stats) = sah.trace_with_stats(&ray, 1e-3, f32::INFINITY);
        assert!(hit.is_some());
        assert!(stats.triangle_tests < scene.triangle_count());
    }

    #[test]
    fn test_strategies_agree_with_flat() {
        let scene = grid_scene(5);
        let flat = Bvh::build_with(
            &scene,
            &BvhOptions {
                strategy: SplitStrategy::Flat,
                ..BvhOptions::default()
            },
        )
        .unwrap();

        for strategy in [SplitStrategy::Sah, SplitStrategy::Median] {
            for max_leaf_size in [1, 2, 4] {
                let bvh = Bvh::build_with(
                    &scene,
                    &BvhOptions {
                        max_leaf_size,
                        strategy,
                    },
                )
                .unwrap();
                for ray in sample_rays(&scene) {
                    let a = flat.trace(&ray, 1e-3, f32::INFINITY);
                    let b = bvh.trace(&ray, 1e-3, f32::INFINITY);
                    match (a, b) {
                        (None, None) => {}
                        (Some(a), Some(b)) => assert_relative_eq!(a.t, b.t, epsilon = 1e-5),
                        (a, b) => panic!("{strategy:?}/{max_leaf_size}: {a:?} vs {b:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let scene = grid_scene(6);
        let rays = sample_rays(&scene);
        let first = Bvh::build(&scene).unwrap();
        let first_hits: Vec<_> = rays
            .iter()
            .map(|r| first.trace(r, 1e-3, f32::INFINITY).map(|h| (h.mesh, h.triangle, h.t)))
            .collect();
        assert!(first_hits.iter().any(Option::is_some));

        for _ in 0..3 {
            let again = Bvh::build(&scene).unwrap();
            assert_eq!(again.nodes(), first.nodes());
            assert_eq!(again.triangle_indices(), first.triangle_indices());
            let hits: Vec<_> = rays
                .iter()
                .map(|r| again.trace(r, 1e-3, f32::INFINITY).map(|h| (h.mesh, h.triangle, h.t)))
                .collect();
            assert_eq!(hits, first_hits);
        }
    }

    #[test]
    fn test_normal_is_interpolated() {
        let mesh = Mesh::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, 0.0), Vec3::x(), Vec2::zeros()),
                Vertex::new(Point3::new(1.0, 0.0, 0.0), Vec3::y(), Vec2::zeros()),
                Vertex::new(Point3::new(0.0, 1.0, 0.0), Vec3::z(), Vec2::zeros()),
            ],
            vec![Triangle::new(0, 1, 2, 0)],
        );
        let scene = Scene::new(vec![mesh], vec![], vec![]);
        let bvh = Bvh::build(&scene).unwrap();
        let ray = Ray::new(Point3::new(0.25, 0.25, -1.0), Vec3::z());
        let hit = bvh.trace(&ray, 1e-3, f32::INFINITY).unwrap();
        assert_relative_eq!(hit.u, 0.25, epsilon = 1e-6);
        assert_relative_eq!(hit.v, 0.25, epsilon = 1e-6);
        assert_relative_eq!(hit.normal.norm(), 1.0, epsilon = 1e-6);
        // Weights (0.5, 0.25, 0.25) before normalization.
        assert_relative_eq!(hit.normal, Vec3::new(0.5, 0.25, 0.25).normalize(), epsilon = 1e-6);
    }
}
