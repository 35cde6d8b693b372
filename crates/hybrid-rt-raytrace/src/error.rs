//! Error types for acceleration structure construction.

use thiserror::Error;

/// Errors that can occur while building a [`Bvh`](crate::Bvh).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BvhError {
    /// The node array, permutation array or primitive table could not be allocated.
    #[error("out of memory while building acceleration structure")]
    OutOfMemory,

    /// A triangle references a vertex its mesh does not have.
    #[error("mesh {mesh} triangle {triangle} references a missing vertex")]
    InvalidTriangle {
        /// Mesh index.
        mesh: usize,
        /// Triangle index within the mesh.
        triangle: usize,
    },
}

/// Result type for acceleration structure operations.
pub type Result<T> = std::result::Result<T, BvhError>;
