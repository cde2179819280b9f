//! Physical device selection
//!
//! First-match policy: candidates are examined in the order the runtime
//! enumerates them and the first one supporting every required device
//! extension wins. No scoring, so identical hardware always yields the same
//! choice.

use std::collections::BTreeSet;

use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::runtime::{DeviceProperties, Runtime};

/// A candidate that was examined and rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRejection {
    /// Device name as reported by the driver
    pub name: String,
    /// Required extensions the device lacks
    pub missing_extensions: BTreeSet<String>,
}

/// The chosen physical device and how it was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelection<P> {
    /// Identifier of the chosen device
    pub device: P,
    /// Properties of the chosen device
    pub properties: DeviceProperties,
    /// Candidates rejected before the chosen one, in examination order
    pub rejected: Vec<DeviceRejection>,
}

/// Required extensions absent from `available`
pub fn missing_device_extensions<S: AsRef<str>>(required: &[String], available: &[S]) -> BTreeSet<String> {
    let available: BTreeSet<&str> = available.iter().map(AsRef::as_ref).collect();
    required
        .iter()
        .filter(|name| !available.contains(name.as_str()))
        .cloned()
        .collect()
}

fn log_device_properties(properties: &DeviceProperties) {
    log::info!(
        "Vulkan device properties: {{ api_version: {}.{}.{}, driver_version: {}, vendor_id: {:#06x}, device_id: {:#06x}, device_type: {}, device_name: {}, pipeline_cache_uuid: {:02x?} }}",
        properties.api_version.major(),
        properties.api_version.minor(),
        properties.api_version.patch(),
        properties.driver_version,
        properties.vendor_id,
        properties.device_id,
        properties.device_type_name(),
        properties.name,
        properties.pipeline_cache_uuid,
    );
}

/// Pick the first physical device that supports every `required` extension
///
/// When `verbose` is set the full properties of every examined candidate are
/// logged, not only those of the winner.
pub fn select_physical_device<R: Runtime>(
    runtime: &R,
    instance: &R::Instance,
    required: &[String],
    verbose: bool,
) -> VulkanResult<DeviceSelection<R::PhysicalDevice>> {
    log::info!("Choosing Vulkan physical device");

    let devices = runtime.enumerate_physical_devices(instance)?;
    if devices.is_empty() {
        return Err(VulkanError::NoGpuFound);
    }

    log::info!("Required Vulkan device extensions: {:?}", required);

    let mut rejected = Vec::new();
    for device in devices {
        let properties = runtime.device_properties(instance, device);
        if verbose {
            log_device_properties(&properties);
        }

        let available = runtime.device_extensions(instance, device)?;
        let missing = missing_device_extensions(required, &available);
        if missing.is_empty() {
            log::info!("Selected GPU: {} ({})", properties.name, properties.device_type_name());
            return Ok(DeviceSelection {
                device,
                properties,
                rejected,
            });
        }

        log::error!("Unsupported Vulkan device extensions on {}: {:?}", properties.name, missing);
        rejected.push(DeviceRejection {
            name: properties.name,
            missing_extensions: missing,
        });
    }

    Err(VulkanError::NoSuitableGpu)
}
