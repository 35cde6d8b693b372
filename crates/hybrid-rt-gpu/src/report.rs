//! Capability report values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rendering backend a device could support.
///
/// Ordered from weakest to strongest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// No usable hardware path; render in software.
    #[default]
    SoftwareOnly,
    /// Ray queries from compute shaders over hardware acceleration structures.
    ComputeFallback,
    /// A dedicated ray-tracing pipeline with acceleration structures.
    DedicatedPipeline,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::SoftwareOnly => "software only",
            BackendKind::ComputeFallback => "compute fallback",
            BackendKind::DedicatedPipeline => "dedicated pipeline",
        })
    }
}

/// What a probe found. The all-false default means software only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    /// Name of the device the flags describe, when known.
    pub device_name: Option<String>,
    /// Dedicated ray-tracing pipeline support.
    pub rt_pipeline: bool,
    /// Hardware acceleration structure support.
    pub accel_struct: bool,
    /// Ray queries from any shader stage.
    pub ray_query: bool,
    /// Buffer device addresses.
    pub buffer_device_address: bool,
    /// Deferred host operations.
    pub deferred_host_ops: bool,
    /// General compute shader support. Informational; does not affect the backend.
    pub compute_shaders: bool,
    /// Backend derived from the flags above.
    pub backend: BackendKind,
}

impl CapabilityReport {
    /// Recompute [`Self::backend`] from the capability flags.
    pub fn classify(mut self) -> Self {
        self.backend = if self.rt_pipeline && self.accel_struct {
            BackendKind::DedicatedPipeline
        } else if self.ray_query && self.accel_struct {
            BackendKind::ComputeFallback
        } else {
            BackendKind::SoftwareOnly
        };
        self
    }

    /// Combine two reports, keeping the one with the stronger backend.
    ///
    /// On equal backends a report naming a device beats one that does not;
    /// otherwise `self` is kept.
    pub fn merge(self, other: CapabilityReport) -> CapabilityReport {
        let other_named = self.device_name.is_none() && other.device_name.is_some();
        if other.backend > self.backend || (other.backend == self.backend && other_named) {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for CapabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(
            f,
            "device:                 {}",
            self.device_name.as_deref().unwrap_or("none")
        )?;
        writeln!(f, "backend:                {}", self.backend)?;
        writeln!(f, "ray tracing pipeline:   {}", yes_no(self.rt_pipeline))?;
        writeln!(f, "acceleration structure: {}", yes_no(self.accel_struct))?;
        writeln!(f, "ray query:              {}", yes_no(self.ray_query))?;
        writeln!(
            f,
            "buffer device address:  {}",
            yes_no(self.buffer_device_address)
        )?;
        writeln!(f, "deferred host ops:      {}", yes_no(self.deferred_host_ops))?;
        write!(f, "compute shaders:        {}", yes_no(self.compute_shaders))
    }
}
