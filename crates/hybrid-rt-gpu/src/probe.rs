//! Probe interface and detection.

use crate::{CapabilityReport, Result};

/// A source of hardware capability information.
pub trait CapabilityProbe: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Query the hardware. Implementations return a classified report.
    fn probe(&self) -> Result<CapabilityReport>;
}

/// Probe that finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProbe;

impl CapabilityProbe for NullProbe {
    fn name(&self) -> &'static str {
        "null"
    }

    fn probe(&self) -> Result<CapabilityReport> {
        Ok(CapabilityReport::default())
    }
}

/// Probes compiled into this build.
pub fn default_probes() -> Vec<Box<dyn CapabilityProbe>> {
    #[allow(unused_mut)]
    let mut probes: Vec<Box<dyn CapabilityProbe>> = Vec::new();
    #[cfg(feature = "vulkan")]
    probes.push(Box::new(crate::VulkanProbe));
    #[cfg(feature = "wgpu")]
    probes.push(Box::new(crate::WgpuAdapterProbe::default()));
    if probes.is_empty() {
        probes.push(Box::new(NullProbe));
    }
    probes
}

/// Run every compiled-in probe. Never fails.
pub fn detect() -> CapabilityReport {
    detect_with(&default_probes())
}

/// Run `probes` and merge their reports, keeping the strongest backend.
///
/// A failing probe is logged at `warn` and contributes an all-false report.
pub fn detect_with(probes: &[Box<dyn CapabilityProbe>]) -> CapabilityReport {
    probes
        .iter()
        .map(|probe| match probe.probe() {
            Ok(report) => {
                tracing::debug!(probe = probe.name(), backend = %report.backend, "probe finished");
                report
            }
            Err(err) => {
                tracing::warn!(probe = probe.name(), error = %err, "capability probe failed");
                CapabilityReport::default()
            }
        })
        .fold(CapabilityReport::default(), CapabilityReport::merge)
}
