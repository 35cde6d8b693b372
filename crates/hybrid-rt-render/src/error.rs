//! Error types for rendering.

use hybrid_rt_raytrace::BvhError;
use thiserror::Error;

/// Errors that can fail a render pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Building the acceleration structure failed.
    #[error("acceleration structure: {0}")]
    Bvh(#[from] BvhError),

    /// The framebuffer could not be allocated.
    #[error("out of memory allocating a {width}x{height} framebuffer")]
    OutOfMemory {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Zero-sized output, or a framebuffer that does not match its size.
    #[error("invalid framebuffer dimensions {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// A render setting is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
