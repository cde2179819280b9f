//! Vulkan bootstrap error types

use ash::vk;
use thiserror::Error;

use crate::vulkan::capabilities::MissingCapabilities;
use crate::vulkan::queue_family::ResolvedQueueFamilies;
use crate::window::WindowError;

/// Errors raised while acquiring or using the Vulkan context
#[derive(Error, Debug)]
pub enum VulkanError {
    /// Requested instance extensions or layers are not offered by the runtime
    #[error("Unsupported Vulkan capabilities: {0}")]
    UnsupportedCapability(MissingCapabilities),

    /// The runtime refused to create the instance
    #[error("Vulkan instance creation failed: {0:?}")]
    ContextCreationFailed(vk::Result),

    /// The runtime refused to create the logical device
    #[error("Vulkan logical device creation failed: {0:?}")]
    LogicalContextCreationFailed(vk::Result),

    /// The instance enumerated no physical devices at all
    #[error("Failed to find GPUs with Vulkan support")]
    NoGpuFound,

    /// Every enumerated physical device was rejected
    #[error("Failed to find a suitable Vulkan GPU")]
    NoSuitableGpu,

    /// No queue family assignment covers both graphics and presentation
    #[error("Failed to find suitable Vulkan queue families (graphics: {graphics:?}, present: {present:?})")]
    IncompleteQueueFamilies {
        /// Graphics family found during the scan, if any
        graphics: Option<u32>,
        /// Present family found during the scan, if any
        present: Option<u32>,
    },

    /// Re-resolving queue families for queue retrieval gave a different
    /// assignment than the one the logical device was built with
    #[error("Vulkan queue families changed since device creation: expected {expected:?}, found {found:?}")]
    QueueFamiliesChanged {
        /// Families the logical device was created with
        expected: ResolvedQueueFamilies,
        /// Families found on re-resolution
        found: ResolvedQueueFamilies,
    },

    /// A dynamically resolved entry point is absent from the instance
    #[error("Vulkan entry point {name} is not available")]
    MissingOptionalEntryPoint {
        /// Name of the entry point that failed to resolve
        name: &'static str,
    },

    /// The Vulkan loader library could not be opened
    #[error("Failed to load Vulkan: {0}")]
    LoaderUnavailable(String),

    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Windowing collaborator failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

impl From<vk::Result> for VulkanError {
    fn from(result: vk::Result) -> Self {
        Self::Api(result)
    }
}
