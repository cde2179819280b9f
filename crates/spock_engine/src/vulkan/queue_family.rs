//! Queue family resolution
//!
//! Finds a graphics-capable family and a family that can present to the
//! surface. Both may be the same family. The first qualifying family wins for
//! each role and is never overwritten; scanning stops once both are known.

use ash::vk;
use std::collections::BTreeSet;

use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::runtime::Runtime;

/// Partially or fully resolved queue family roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// Family used for graphics submission
    pub graphics_family: Option<u32>,
    /// Family used for presentation
    pub present_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// Both roles are assigned
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some()
    }

    /// Completed form, if both roles are assigned
    pub fn resolved(&self) -> Option<ResolvedQueueFamilies> {
        Some(ResolvedQueueFamilies {
            graphics: self.graphics_family?,
            present: self.present_family?,
        })
    }
}

/// Queue family roles with both indices known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQueueFamilies {
    /// Family used for graphics submission
    pub graphics: u32,
    /// Family used for presentation
    pub present: u32,
}

impl ResolvedQueueFamilies {
    /// Distinct family indices in ascending order
    pub fn unique_families(&self) -> Vec<u32> {
        [self.graphics, self.present]
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Scan `families` in index order
///
/// `supports_present` is queried for each family with at least one queue
/// until both roles are assigned.
pub fn resolve<F>(families: &[vk::QueueFamilyProperties], mut supports_present: F) -> VulkanResult<ResolvedQueueFamilies>
where
    F: FnMut(u32) -> VulkanResult<bool>,
{
    let mut indices = QueueFamilyIndices::default();

    for (index, family) in (0u32..).zip(families) {
        if family.queue_count == 0 {
            continue;
        }

        if indices.graphics_family.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            indices.graphics_family = Some(index);
            log::info!("Found suitable Vulkan graphics queue family: {}", index);
        }

        if indices.present_family.is_none() && supports_present(index)? {
            indices.present_family = Some(index);
            log::info!("Found suitable Vulkan present queue family: {}", index);
        }

        if let Some(resolved) = indices.resolved() {
            return Ok(resolved);
        }
    }

    Err(VulkanError::IncompleteQueueFamilies {
        graphics: indices.graphics_family,
        present: indices.present_family,
    })
}

/// Resolve the graphics and present families of `device` for `surface`
pub fn find_queue_families<R: Runtime>(
    runtime: &R,
    instance: &R::Instance,
    device: R::PhysicalDevice,
    surface: &R::Surface,
) -> VulkanResult<ResolvedQueueFamilies> {
    log::info!("Finding Vulkan queue families");

    let families = runtime.queue_families(instance, device);
    resolve(&families, |index| runtime.surface_support(instance, device, index, surface))
}
