//! Vulkan ray-tracing capability probe.

use std::ffi::CStr;

use ash::vk;
use ash::{Entry, Instance};

use crate::{CapabilityProbe, CapabilityReport, ProbeError, Result};

const API: &str = "vulkan";

/// Queries every physical device for ray-tracing extensions and feature bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct VulkanProbe;

impl CapabilityProbe for VulkanProbe {
    fn name(&self) -> &'static str {
        API
    }

    fn probe(&self) -> Result<CapabilityReport> {
        let entry = unsafe { Entry::load() }.map_err(|e| ProbeError::Unavailable {
            api: API,
            reason: e.to_string(),
        })?;

        let app_info = vk::ApplicationInfo::default()
            .application_name(c"hybrid-rt probe")
            .api_version(vk::API_VERSION_1_2);
        let create_info = vk::InstanceCreateInfo::default().application_info(&app_info);
        let instance = unsafe { entry.create_instance(&create_info, None) }.map_err(query_error)?;

        let report = best_device_report(&instance);
        unsafe { instance.destroy_instance(None) };
        report
    }
}

fn query_error(err: vk::Result) -> ProbeError {
    ProbeError::Query {
        api: API,
        reason: err.to_string(),
    }
}

fn best_device_report(instance: &Instance) -> Result<CapabilityReport> {
    let devices = unsafe { instance.enumerate_physical_devices() }.map_err(query_error)?;
    if devices.is_empty() {
        return Err(ProbeError::NoAdapter);
    }

    let mut best = CapabilityReport::default();
    for device in devices {
        let report = match device_report(instance, device) {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "skipping vulkan device");
                continue;
            }
        };
        tracing::debug!(
            device = report.device_name.as_deref().unwrap_or("?"),
            backend = %report.backend,
            "vulkan device"
        );
        best = best.merge(report);
    }
    Ok(best)
}

/// Feature bits reported by `vkGetPhysicalDeviceFeatures2` and the queue families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FeatureBits {
    rt_pipeline: bool,
    accel_struct: bool,
    ray_query: bool,
    buffer_device_address: bool,
    compute_queue: bool,
    /// Buffer device address is core from Vulkan 1.2.
    vulkan_1_2: bool,
}

fn device_report(instance: &Instance, device: vk::PhysicalDevice) -> Result<CapabilityReport> {
    let properties = unsafe { instance.get_physical_device_properties(device) };
    let extensions =
        unsafe { instance.enumerate_device_extension_properties(device) }.map_err(query_error)?;
    let names: Vec<&CStr> = extensions
        .iter()
        .filter_map(|ext| ext.extension_name_as_c_str().ok())
        .collect();

    let mut rt_pipeline = vk::PhysicalDeviceRayTracingPipelineFeaturesKHR::default();
    let mut accel_struct = vk::PhysicalDeviceAccelerationStructureFeaturesKHR::default();
    let mut ray_query = vk::PhysicalDeviceRayQueryFeaturesKHR::default();
    let mut bda = vk::PhysicalDeviceBufferDeviceAddressFeatures::default();
    {
        let mut features2 = vk::PhysicalDeviceFeatures2::default()
            .push_next(&mut rt_pipeline)
            .push_next(&mut accel_struct)
            .push_next(&mut ray_query)
            .push_next(&mut bda);
        unsafe { instance.get_physical_device_features2(device, &mut features2) };
    }

    let queue_families = unsafe { instance.get_physical_device_queue_family_properties(device) };
    let bits = FeatureBits {
        rt_pipeline: rt_pipeline.ray_tracing_pipeline == vk::TRUE,
        accel_struct: accel_struct.acceleration_structure == vk::TRUE,
        ray_query: ray_query.ray_query == vk::TRUE,
        buffer_device_address: bda.buffer_device_address == vk::TRUE,
        compute_queue: queue_families
            .iter()
            .any(|family| family.queue_flags.contains(vk::QueueFlags::COMPUTE)),
        vulkan_1_2: properties.api_version >= vk::API_VERSION_1_2,
    };

    let device_name = properties
        .device_name_as_c_str()
        .ok()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(capability_report(device_name, &names, bits))
}

/// A capability counts only when its extension is listed and its feature bit is set.
fn capability_report(
    device_name: Option<String>,
    extensions: &[&CStr],
    bits: FeatureBits,
) -> CapabilityReport {
    let has = |wanted: &CStr| extensions.iter().any(|name| *name == wanted);
    CapabilityReport {
        device_name,
        rt_pipeline: has(ash::khr::ray_tracing_pipeline::NAME) && bits.rt_pipeline,
        accel_struct: has(ash::khr::acceleration_structure::NAME) && bits.accel_struct,
        ray_query: has(ash::khr::ray_query::NAME) && bits.ray_query,
        buffer_device_address: (has(ash::khr::buffer_device_address::NAME) || bits.vulkan_1_2)
            && bits.buffer_device_address,
        deferred_host_ops: has(ash::khr::deferred_host_operations::NAME),
        compute_shaders: bits.compute_queue,
        ..Default::default()
    }
    .classify()
}
