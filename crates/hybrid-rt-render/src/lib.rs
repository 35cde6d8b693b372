#![warn(missing_docs)]

//! Software rendering for the hybrid raytracer.
//!
//! Turns a [`Scene`](hybrid_rt_scene::Scene) into an RGBA8 [`Framebuffer`]:
//! one camera ray per pixel, a nearest-hit query against a
//! [`Bvh`](hybrid_rt_raytrace::Bvh), and single-light shading of the hit.
//!
//! # Example
//!
//! ```
//! use hybrid_rt_render::{render, RenderSettings};
//! use hybrid_rt_scene::demo_scene;
//!
//! let scene = demo_scene();
//! let settings = RenderSettings {
//!     width: 32,
//!     height: 32,
//!     ..RenderSettings::default()
//! };
//! let frame = render(&scene, &settings).unwrap();
//! assert_eq!(frame.rgba8().len(), 32 * 32 * 4);
//! ```

pub mod error;
pub mod frame;
pub mod settings;
pub mod shade;

pub use error::{RenderError, Result};
pub use frame::{quantize, render, render_with_bvh, Framebuffer};
pub use settings::{Camera, RenderSettings};
pub use shade::{shade, ShadingParams};
