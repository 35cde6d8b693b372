//! Error types for scene loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Reading the scene file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The scene document is not valid JSON for a scene.
    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    /// A triangle references a vertex that does not exist in its mesh.
    #[error("mesh {mesh} triangle {triangle} references vertex {vertex} (mesh has {vertex_count})")]
    InvalidReference {
        /// Mesh index.
        mesh: usize,
        /// Triangle index within the mesh.
        triangle: usize,
        /// The offending vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
