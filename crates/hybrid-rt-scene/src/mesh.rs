//! Triangle meshes.

use hybrid_rt_math::{Point3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A mesh vertex: position, shading normal and texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Object-space position.
    pub position: Point3,
    /// Vertex normal, blended across the triangle at hit time.
    pub normal: Vec3,
    /// Texture coordinate (u, v).
    pub uv: Vec2,
}

impl Vertex {
    /// Create a vertex.
    pub fn new(position: Point3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A triangle: three vertex indices into the owning mesh plus a material index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// Vertex indices, counter-clockwise.
    pub indices: [u32; 3],
    /// Index into the scene material table.
    #[serde(default)]
    pub material: usize,
}

impl Triangle {
    /// Create a triangle.
    pub fn new(i0: u32, i1: u32, i2: u32, material: usize) -> Self {
        Self {
            indices: [i0, i1, i2],
            material,
        }
    }
}

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex pool.
    pub vertices: Vec<Vertex>,
    /// Triangles indexing into `vertices`.
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a mesh from its vertices and triangles.
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// The three vertices of triangle `index`, or `None` if the triangle does
    /// not exist or references a vertex out of range.
    pub fn triangle_vertices(&self, index: usize) -> Option<[&Vertex; 3]> {
        let tri = self.triangles.get(index)?;
        let [i0, i1, i2] = tri.indices;
        Some([
            self.vertices.get(i0 as usize)?,
            self.vertices.get(i1 as usize)?,
            self.vertices.get(i2 as usize)?,
        ])
    }

    /// Positions of the three vertices of triangle `index`.
    pub fn triangle_positions(&self, index: usize) -> Option<[Point3; 3]> {
        self.triangle_vertices(index)
            .map(|[a, b, c]| [a.position, b.position, c.position])
    }
}
