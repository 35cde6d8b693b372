//! wgpu adapter probe.

use wgpu::{Backends, DownlevelFlags, Features, Instance, PowerPreference};

use crate::{CapabilityProbe, CapabilityReport, ProbeError, Result};

/// Asks wgpu for its preferred adapter and reads its features.
#[derive(Debug, Clone, Copy)]
pub struct WgpuAdapterProbe {
    /// Backends wgpu may pick from.
    pub backends: Backends,
}

impl Default for WgpuAdapterProbe {
    fn default() -> Self {
        Self {
            backends: Backends::PRIMARY,
        }
    }
}

impl CapabilityProbe for WgpuAdapterProbe {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn probe(&self) -> Result<CapabilityReport> {
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(ProbeError::NoAdapter)?;

        let info = adapter.get_info();
        let features = adapter.features();
        let downlevel = adapter.get_downlevel_capabilities();

        Ok(CapabilityReport {
            device_name: Some(info.name),
            accel_struct: features.contains(Features::RAY_TRACING_ACCELERATION_STRUCTURE),
            ray_query: features.contains(Features::RAY_QUERY),
            compute_shaders: downlevel.flags.contains(DownlevelFlags::COMPUTE_SHADERS),
            ..Default::default()
        }
        .classify())
    }
}
