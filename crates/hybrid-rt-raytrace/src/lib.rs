#![warn(missing_docs)]

//! Triangle ray tracing for the hybrid renderer.
//!
//! This crate provides the acceleration structure and the geometric tests
//! that answer "what does this ray hit first?" for a [`Scene`].
//!
//! # Architecture
//!
//! - [`Ray`] - Ray representation with origin and direction
//! - [`HitRecord`] - Nearest-hit result with barycentrics and shading normal
//! - [`intersect`] - Ray-box (slab) and ray-triangle (Möller-Trumbore) tests
//! - [`bvh`] - Bounding volume hierarchy over every triangle of a scene
//!
//! # Example
//!
//! ```
//! use hybrid_rt_math::{Point3, Vec3};
//! use hybrid_rt_raytrace::{Bvh, Ray};
//! use hybrid_rt_scene::demo_scene;
//!
//! let scene = demo_scene();
//! let bvh = Bvh::build(&scene).unwrap();
//!
//! let ray = Ray::new(Point3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, 1.0));
//! let hit = bvh.trace(&ray, 1e-3, f32::INFINITY).unwrap();
//! assert!((hit.t - 3.0).abs() < 1e-5);
//! ```
//!
//! [`Scene`]: hybrid_rt_scene::Scene

mod ray;
pub mod bvh;
pub mod error;
pub mod intersect;

pub use bvh::{Bvh, BvhNode, BvhOptions, SplitStrategy, TraversalStats};
pub use error::{BvhError, Result};
pub use ray::{HitRecord, Ray};
