//! Vulkan context acquisition
//!
//! Organized leaf-first: capability probing, instance creation, diagnostics,
//! physical device selection, queue family resolution and logical device
//! creation, tied together by [`context::bootstrap`].

pub mod ash_runtime;
pub mod capabilities;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod logical_device;
pub mod physical_device;
pub mod platform;
pub mod queue_family;
pub mod runtime;

#[cfg(test)]
pub(crate) mod mock;

pub use ash_runtime::AshRuntime;
pub use capabilities::{CapabilitySet, MissingCapabilities};
pub use context::{bootstrap, BootstrapSettings, RenderContext};
pub use error::{VulkanError, VulkanResult};
pub use logical_device::QueueHandles;
pub use physical_device::{DeviceRejection, DeviceSelection};
pub use platform::{Platform, PlatformCapabilities};
pub use queue_family::{QueueFamilyIndices, ResolvedQueueFamilies};
pub use runtime::{ApiVersion, DeviceProperties, Runtime, SurfaceSource};
