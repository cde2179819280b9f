//! Runtime abstraction for the bootstrap sequence
//!
//! The bootstrap components never talk to the Vulkan loader directly. They go
//! through [`Runtime`], which exposes exactly the capability queries and
//! creation calls the sequence needs. Every owned handle is an associated type
//! whose `Drop` performs its single destroy call, so ownership of a handle is
//! ownership of its teardown.
//!
//! [`crate::vulkan::ash_runtime::AshRuntime`] is the production implementation.

use ash::vk;
use std::fmt;
use std::os::raw::c_char;

use crate::vulkan::error::VulkanResult;

/// Device extension required for presenting to a surface
pub const SWAPCHAIN_EXTENSION: &str = "VK_KHR_swapchain";

/// Instance extension backing the diagnostics channel
pub const DEBUG_REPORT_EXTENSION: &str = "VK_EXT_debug_report";

/// Standard Khronos validation layer
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Packed Vulkan version number as reported by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion(pub u32);

impl ApiVersion {
    /// Version reported by loaders that predate `vkEnumerateInstanceVersion`
    pub const V1_0: Self = Self(vk::API_VERSION_1_0);

    /// Build a version from its components
    pub fn new(variant: u32, major: u32, minor: u32, patch: u32) -> Self {
        Self(vk::make_api_version(variant, major, minor, patch))
    }

    /// Variant component
    pub fn variant(self) -> u32 {
        vk::api_version_variant(self.0)
    }

    /// Major component
    pub fn major(self) -> u32 {
        vk::api_version_major(self.0)
    }

    /// Minor component
    pub fn minor(self) -> u32 {
        vk::api_version_minor(self.0)
    }

    /// Patch component
    pub fn patch(self) -> u32 {
        vk::api_version_patch(self.0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant {} version: {}.{}.{}", self.variant(), self.major(), self.minor(), self.patch())
    }
}

/// Everything needed to create an instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRequest {
    /// Application name reported to the driver
    pub application_name: String,
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Used as application, engine and API version
    pub version: ApiVersion,
    /// Instance extensions to enable, in order, without duplicates
    pub extensions: Vec<String>,
    /// Instance layers to enable, in order, without duplicates
    pub layers: Vec<String>,
    /// Instance creation flags
    pub flags: vk::InstanceCreateFlags,
}

/// One queue-creation request for a logical device
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
    /// Queue family the queues are taken from
    pub family_index: u32,
    /// One priority per requested queue
    pub priorities: Vec<f32>,
}

/// Everything needed to create a logical device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    /// One entry per distinct queue family
    pub queues: Vec<QueueRequest>,
    /// Device extensions to enable
    pub extensions: Vec<String>,
    /// Device layers to enable (ignored by modern loaders, kept for older ones)
    pub layers: Vec<String>,
}

/// Read-only description of a physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Human readable device name
    pub name: String,
    /// Highest API version the device supports
    pub api_version: ApiVersion,
    /// Vendor specific driver version
    pub driver_version: u32,
    /// PCI vendor id
    pub vendor_id: u32,
    /// Vendor specific device id
    pub device_id: u32,
    /// Device type classification
    pub device_type: vk::PhysicalDeviceType,
    /// Pipeline cache UUID
    pub pipeline_cache_uuid: [u8; vk::UUID_SIZE],
}

impl DeviceProperties {
    /// Readable name of the device type
    pub fn device_type_name(&self) -> &'static str {
        match self.device_type {
            vk::PhysicalDeviceType::OTHER => "Other",
            vk::PhysicalDeviceType::INTEGRATED_GPU => "Integrated GPU",
            vk::PhysicalDeviceType::DISCRETE_GPU => "Discrete GPU",
            vk::PhysicalDeviceType::VIRTUAL_GPU => "Virtual GPU",
            vk::PhysicalDeviceType::CPU => "CPU",
            _ => "Unknown",
        }
    }
}

impl From<&vk::PhysicalDeviceProperties> for DeviceProperties {
    fn from(properties: &vk::PhysicalDeviceProperties) -> Self {
        Self {
            name: c_chars_to_string(&properties.device_name),
            api_version: ApiVersion(properties.api_version),
            driver_version: properties.driver_version,
            vendor_id: properties.vendor_id,
            device_id: properties.device_id,
            device_type: properties.device_type,
            pipeline_cache_uuid: properties.pipeline_cache_uuid,
        }
    }
}

/// Convert a fixed-size, NUL-terminated Vulkan name array into a `String`
pub fn c_chars_to_string(chars: &[c_char]) -> String {
    let bytes: Vec<u8> = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Capability queries and creation calls used by the bootstrap sequence
///
/// Creation calls return owned handles; dropping a handle destroys it. Callers
/// are responsible only for dropping handles in dependency order, which
/// [`crate::vulkan::RenderContext`] does structurally.
pub trait Runtime {
    /// Execution context (`VkInstance`)
    type Instance;
    /// Diagnostics sink (`VkDebugReportCallbackEXT`)
    type Diagnostics;
    /// Presentation surface (`VkSurfaceKHR`)
    type Surface;
    /// Logical context (`VkDevice`)
    type Device;
    /// Non-owning physical device identifier
    type PhysicalDevice: Copy + Eq + fmt::Debug;
    /// Non-owning queue reference into a logical device
    type Queue: Copy + fmt::Debug;

    /// Highest instance version the loader supports
    fn instance_version(&self) -> VulkanResult<ApiVersion>;

    /// Names of all globally available instance extensions
    fn available_extensions(&self) -> VulkanResult<Vec<String>>;

    /// Names of all globally available instance layers
    fn available_layers(&self) -> VulkanResult<Vec<String>>;

    /// Create an instance; refusal is reported as `ContextCreationFailed`
    fn create_instance(&self, request: &InstanceRequest) -> VulkanResult<Self::Instance>;

    /// Register the debug-report callback; a missing entry point is reported
    /// as `MissingOptionalEntryPoint`
    fn create_diagnostics(&self, instance: &Self::Instance) -> VulkanResult<Self::Diagnostics>;

    /// Physical devices in runtime order
    fn enumerate_physical_devices(&self, instance: &Self::Instance) -> VulkanResult<Vec<Self::PhysicalDevice>>;

    /// Properties of one physical device
    fn device_properties(&self, instance: &Self::Instance, device: Self::PhysicalDevice) -> DeviceProperties;

    /// Names of the extensions a physical device supports
    fn device_extensions(&self, instance: &Self::Instance, device: Self::PhysicalDevice) -> VulkanResult<Vec<String>>;

    /// Queue family descriptors in index order
    fn queue_families(&self, instance: &Self::Instance, device: Self::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;

    /// Whether a queue family of `device` can present to `surface`
    fn surface_support(
        &self,
        instance: &Self::Instance,
        device: Self::PhysicalDevice,
        family_index: u32,
        surface: &Self::Surface,
    ) -> VulkanResult<bool>;

    /// Create a logical device; refusal is reported as `LogicalContextCreationFailed`
    fn create_device(
        &self,
        instance: &Self::Instance,
        device: Self::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VulkanResult<Self::Device>;

    /// Queue `queue_index` of family `family_index`
    fn device_queue(&self, device: &Self::Device, family_index: u32, queue_index: u32) -> Self::Queue;
}

/// Windowing collaborator that can host a presentation surface
pub trait SurfaceSource<R: Runtime> {
    /// Instance extensions the windowing layer needs for surface creation
    fn required_instance_extensions(&self) -> VulkanResult<Vec<String>>;

    /// Create a surface for this window on `instance`
    fn create_surface(&mut self, runtime: &R, instance: &R::Instance) -> VulkanResult<R::Surface>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_components() {
        let version = ApiVersion::new(0, 1, 3, 250);
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 3);
        assert_eq!(version.patch(), 250);
        assert_eq!(version.to_string(), "variant 0 version: 1.3.250");
    }

    #[test]
    fn test_c_chars_stop_at_nul() {
        let mut raw = [0 as c_char; 16];
        for (slot, byte) in raw.iter_mut().zip(b"llvmpipe") {
            *slot = *byte as c_char;
        }
        assert_eq!(c_chars_to_string(&raw), "llvmpipe");
    }

    #[test]
    fn test_device_type_names() {
        let mut properties = DeviceProperties {
            name: "gpu".to_string(),
            api_version: ApiVersion::V1_0,
            driver_version: 0,
            vendor_id: 0,
            device_id: 0,
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            pipeline_cache_uuid: [0; vk::UUID_SIZE],
        };
        assert_eq!(properties.device_type_name(), "Discrete GPU");
        properties.device_type = vk::PhysicalDeviceType::CPU;
        assert_eq!(properties.device_type_name(), "CPU");
        properties.device_type = vk::PhysicalDeviceType::from_raw(42);
        assert_eq!(properties.device_type_name(), "Unknown");
    }
}
