//! Platform capability table
//!
//! Some platforms only expose Vulkan through a portability layer (MoltenVK on
//! macOS). Those need extra instance extensions, an instance creation flag and
//! a device extension. The table is resolved once from [`Platform::current`]
//! and consulted by instance and logical device creation.

use ash::vk;

/// `VK_INSTANCE_CREATE_ENUMERATE_PORTABILITY_BIT_KHR`
const ENUMERATE_PORTABILITY: u32 = 0x0000_0001;

const PORTABILITY_INSTANCE_EXTENSIONS: &[&str] = &[
    "VK_KHR_portability_enumeration",
    "VK_KHR_get_physical_device_properties2",
];

const PORTABILITY_DEVICE_EXTENSIONS: &[&str] = &["VK_KHR_portability_subset"];

/// Platform discriminant relevant to Vulkan setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Vulkan through the portability subset
    MacOs,
    /// Native Vulkan driver
    Native,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Native
        }
    }

    /// Capabilities this platform requires
    pub fn capabilities(self) -> PlatformCapabilities {
        match self {
            Self::MacOs => PlatformCapabilities {
                instance_extensions: PORTABILITY_INSTANCE_EXTENSIONS,
                instance_flags: vk::InstanceCreateFlags::from_raw(ENUMERATE_PORTABILITY),
                device_extensions: PORTABILITY_DEVICE_EXTENSIONS,
            },
            Self::Native => PlatformCapabilities {
                instance_extensions: &[],
                instance_flags: vk::InstanceCreateFlags::empty(),
                device_extensions: &[],
            },
        }
    }
}

/// Extensions and flags a platform adds to instance and device creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Appended to the instance extension list
    pub instance_extensions: &'static [&'static str],
    /// OR-ed into the instance creation flags
    pub instance_flags: vk::InstanceCreateFlags,
    /// Appended to the device extension list
    pub device_extensions: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_platform_adds_nothing() {
        let caps = Platform::Native.capabilities();
        assert!(caps.instance_extensions.is_empty());
        assert!(caps.device_extensions.is_empty());
        assert!(caps.instance_flags.is_empty());
    }

    #[test]
    fn test_macos_platform_requires_portability() {
        let caps = Platform::MacOs.capabilities();
        assert_eq!(
            caps.instance_extensions,
            &["VK_KHR_portability_enumeration", "VK_KHR_get_physical_device_properties2"]
        );
        assert_eq!(caps.device_extensions, &["VK_KHR_portability_subset"]);
        assert_eq!(caps.instance_flags.as_raw(), 1);
    }

    #[test]
    fn test_current_platform_matches_target() {
        assert_eq!(Platform::current() == Platform::MacOs, cfg!(target_os = "macos"));
    }
}
