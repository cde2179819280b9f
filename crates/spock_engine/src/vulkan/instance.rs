//! Instance creation
//!
//! Assembles the extension and layer lists for the instance (windowing layer,
//! platform table, diagnostics), probes them against the runtime and creates
//! the instance with the loader's own version.

use crate::vulkan::capabilities::{self, CapabilitySet};
use crate::vulkan::context::BootstrapSettings;
use crate::vulkan::error::VulkanResult;
use crate::vulkan::runtime::{InstanceRequest, Runtime, SurfaceSource, DEBUG_REPORT_EXTENSION, VALIDATION_LAYER};

/// Append `name` unless it is already present
pub(crate) fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|existing| existing == name) {
        list.push(name.to_string());
    }
}

/// Build the instance request without creating anything
pub fn instance_request<R, W>(runtime: &R, window: &W, settings: &BootstrapSettings) -> VulkanResult<InstanceRequest>
where
    R: Runtime,
    W: SurfaceSource<R>,
{
    let version = runtime.instance_version()?;
    log::info!("Vulkan {}", version);

    let platform = settings.platform.capabilities();

    let mut extensions = Vec::new();
    let window_extensions = window.required_instance_extensions()?;
    log::info!("Required Vulkan window extensions: {:?}", window_extensions);
    for name in &window_extensions {
        push_unique(&mut extensions, name);
    }

    if !platform.instance_extensions.is_empty() {
        log::info!("Required Vulkan {:?} extensions: {:?}", settings.platform, platform.instance_extensions);
        for name in platform.instance_extensions {
            push_unique(&mut extensions, name);
        }
    }

    let mut layers = Vec::new();
    if settings.enable_validation {
        push_unique(&mut extensions, DEBUG_REPORT_EXTENSION);
        push_unique(&mut layers, VALIDATION_LAYER);
    }

    Ok(InstanceRequest {
        application_name: settings.application_name.clone(),
        engine_name: settings.engine_name.clone(),
        version,
        extensions,
        layers,
        flags: platform.instance_flags,
    })
}

/// Probe and create the instance
pub fn create_instance<R, W>(runtime: &R, window: &W, settings: &BootstrapSettings) -> VulkanResult<R::Instance>
where
    R: Runtime,
    W: SurfaceSource<R>,
{
    log::info!("Creating Vulkan instance for \"{}\"", settings.application_name);

    let request = instance_request(runtime, window, settings)?;

    let requested = CapabilitySet::new(request.extensions.iter().cloned(), request.layers.iter().cloned());
    capabilities::check_support(runtime, &requested)?;

    log::info!(
        "Creating Vulkan instance: extensions={:?}, layers={:?}, flags={:?}",
        request.extensions,
        request.layers,
        request.flags
    );
    runtime.create_instance(&request)
}
