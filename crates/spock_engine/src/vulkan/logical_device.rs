//! Logical device creation and queue retrieval

use crate::vulkan::context::BootstrapSettings;
use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::instance::push_unique;
use crate::vulkan::queue_family::{self, ResolvedQueueFamilies};
use crate::vulkan::runtime::{DeviceRequest, QueueRequest, Runtime, VALIDATION_LAYER};

/// Priority given to every requested queue
pub const QUEUE_PRIORITY: f32 = 1.0;

/// Graphics and present queues of a logical device
///
/// Plain copies of non-owning handles; they must not be used after the
/// logical device that produced them is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueHandles<Q> {
    /// Queue for graphics submission
    pub graphics: Q,
    /// Queue for presentation
    pub present: Q,
}

/// Build the device request: one queue per distinct family
pub fn device_request(families: &ResolvedQueueFamilies, settings: &BootstrapSettings) -> DeviceRequest {
    let queues = families
        .unique_families()
        .into_iter()
        .map(|family_index| QueueRequest {
            family_index,
            priorities: vec![QUEUE_PRIORITY],
        })
        .collect();

    let mut extensions = settings.device_extensions();
    for name in settings.platform.capabilities().device_extensions {
        push_unique(&mut extensions, name);
    }

    let mut layers = Vec::new();
    if settings.enable_validation {
        push_unique(&mut layers, VALIDATION_LAYER);
    }

    DeviceRequest {
        queues,
        extensions,
        layers,
    }
}

/// Create the logical device for `device` with the resolved families
pub fn create_logical_device<R: Runtime>(
    runtime: &R,
    instance: &R::Instance,
    device: R::PhysicalDevice,
    families: &ResolvedQueueFamilies,
    settings: &BootstrapSettings,
) -> VulkanResult<R::Device> {
    log::info!("Creating Vulkan logical device");

    let request = device_request(families, settings);
    log::info!(
        "Creating Vulkan logical device: queue_families={:?}, extensions={:?}, layers={:?}",
        request.queues.iter().map(|q| q.family_index).collect::<Vec<_>>(),
        request.extensions,
        request.layers
    );

    runtime.create_device(instance, device, &request)
}

/// Fetch queue 0 of the graphics and present families
///
/// The families are resolved again from the device and surface; a result
/// different from `expected` means the surface changed underneath us.
pub fn get_queues<R: Runtime>(
    runtime: &R,
    instance: &R::Instance,
    physical_device: R::PhysicalDevice,
    logical_device: &R::Device,
    surface: &R::Surface,
    expected: &ResolvedQueueFamilies,
) -> VulkanResult<QueueHandles<R::Queue>> {
    log::info!("Getting Vulkan queues");

    let families = queue_family::find_queue_families(runtime, instance, physical_device, surface)?;
    if families != *expected {
        log::error!("Queue families changed between resolutions: {:?} != {:?}", families, expected);
        return Err(VulkanError::QueueFamiliesChanged {
            expected: *expected,
            found: families,
        });
    }

    Ok(QueueHandles {
        graphics: runtime.device_queue(logical_device, families.graphics, 0),
        present: runtime.device_queue(logical_device, families.present, 0),
    })
}
