//! Hardware capability probing for the hybrid raytracer.
//!
//! Probes are advisory. They report what a graphics device could accelerate
//! but never gate the software renderer: [`detect`] always returns a report,
//! degrading to [`BackendKind::SoftwareOnly`] when nothing is found or a probe
//! fails.
//!
//! Native probes are behind cargo features:
//! - `vulkan`: queries ray-tracing extensions through the Vulkan loader
//! - `wgpu`: queries the default wgpu adapter

#![warn(missing_docs)]

mod error;
mod probe;
mod report;

#[cfg(feature = "wgpu")]
mod adapter;
#[cfg(feature = "vulkan")]
mod vulkan;

pub use error::{ProbeError, Result};
pub use probe::{default_probes, detect, detect_with, CapabilityProbe, NullProbe};
pub use report::{BackendKind, CapabilityReport};

#[cfg(feature = "wgpu")]
pub use adapter::WgpuAdapterProbe;
#[cfg(feature = "vulkan")]
pub use vulkan::VulkanProbe;
