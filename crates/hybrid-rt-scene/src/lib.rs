#![warn(missing_docs)]

//! Scene data for the hybrid raytracer.
//!
//! A [`Scene`] is a plain collection of meshes, materials and textures. It is
//! built once (procedurally via [`demo_scene`] or from JSON) and treated as
//! read-only for as long as any acceleration structure refers to it.
//!
//! Material and texture references are soft: an index that is absent or out
//! of range is not an error, it simply falls back to neutral behavior at
//! shading time.

pub mod demo;
pub mod error;
mod material;
mod mesh;
mod scene;
mod texture;

pub use demo::demo_scene;
pub use error::{Result, SceneError};
pub use material::Material;
pub use mesh::{Mesh, Triangle, Vertex};
pub use scene::Scene;
pub use texture::{sample_texture, Texture};
