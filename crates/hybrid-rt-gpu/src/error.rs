//! Probe errors.

use thiserror::Error;

/// Errors a single probe can hit. [`crate::detect`] logs and absorbs them.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The native API or its loader is not present.
    #[error("{api} unavailable: {reason}")]
    Unavailable {
        /// API that was probed.
        api: &'static str,
        /// Loader or driver message.
        reason: String,
    },

    /// No compatible adapter or physical device found.
    #[error("no compatible adapter found")]
    NoAdapter,

    /// A native call failed while querying.
    #[error("{api} query failed: {reason}")]
    Query {
        /// API that was probed.
        api: &'static str,
        /// Error reported by the API.
        reason: String,
    },
}

/// Result type for probes.
pub type Result<T> = std::result::Result<T, ProbeError>;
