//! Instance capability probing
//!
//! Instance creation fails in unhelpful ways when an extension or layer is
//! missing, so the requested names are checked against what the loader offers
//! first and the exact difference is reported.

use std::collections::BTreeSet;
use std::fmt;

use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::runtime::Runtime;

/// A set of instance extension names and layer names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    /// Instance extension names
    pub extensions: BTreeSet<String>,
    /// Instance layer names
    pub layers: BTreeSet<String>,
}

impl CapabilitySet {
    /// Build a set from any iterables of names
    pub fn new<E, L>(extensions: E, layers: L) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            layers: layers.into_iter().map(Into::into).collect(),
        }
    }

    /// Names in `self` that `available` does not provide
    pub fn missing_from(&self, available: &CapabilitySet) -> MissingCapabilities {
        MissingCapabilities {
            extensions: self.extensions.difference(&available.extensions).cloned().collect(),
            layers: self.layers.difference(&available.layers).cloned().collect(),
        }
    }
}

/// Requested names the runtime does not offer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingCapabilities {
    /// Missing instance extensions
    pub extensions: BTreeSet<String>,
    /// Missing instance layers
    pub layers: BTreeSet<String>,
}

impl MissingCapabilities {
    /// True when nothing is missing
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.layers.is_empty()
    }
}

impl fmt::Display for MissingCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extensions={:?}, layers={:?}", self.extensions, self.layers)
    }
}

/// Pass iff every requested name is available
pub fn probe(requested: &CapabilitySet, available: &CapabilitySet) -> Result<(), MissingCapabilities> {
    let missing = requested.missing_from(available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Query the runtime for its available extensions and layers
pub fn query_available<R: Runtime>(runtime: &R) -> VulkanResult<CapabilitySet> {
    let available = CapabilitySet::new(runtime.available_extensions()?, runtime.available_layers()?);
    log::info!("Supported Vulkan extensions: {:?}", available.extensions);
    log::info!("Supported Vulkan layers: {:?}", available.layers);
    Ok(available)
}

/// Fail with `UnsupportedCapability` unless the runtime offers every requested name
pub fn check_support<R: Runtime>(runtime: &R, requested: &CapabilitySet) -> VulkanResult<()> {
    let available = query_available(runtime)?;
    probe(requested, &available).map_err(|missing| {
        if !missing.extensions.is_empty() {
            log::error!("Unsupported extensions: {:?}", missing.extensions);
        }
        if !missing.layers.is_empty() {
            log::error!("Unsupported layers: {:?}", missing.layers);
        }
        VulkanError::UnsupportedCapability(missing)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulkan::mock::MockRuntime;

    fn set(extensions: &[&str], layers: &[&str]) -> CapabilitySet {
        CapabilitySet::new(extensions.iter().copied(), layers.iter().copied())
    }

    #[test]
    fn test_probe_passes_for_subset() {
        let available = set(&["VK_KHR_surface", "VK_EXT_debug_report"], &["VK_LAYER_KHRONOS_validation"]);
        assert!(probe(&set(&["VK_KHR_surface"], &[]), &available).is_ok());
        assert!(probe(&available, &available).is_ok());
        assert!(probe(&CapabilitySet::default(), &available).is_ok());
    }

    #[test]
    fn test_probe_reports_exact_difference() {
        let available = set(&["VK_KHR_surface", "VK_KHR_xcb_surface"], &["VK_LAYER_A"]);
        let requested = set(
            &["VK_KHR_surface", "VK_EXT_debug_report", "VK_KHR_portability_enumeration"],
            &["VK_LAYER_A", "VK_LAYER_KHRONOS_validation"],
        );

        let missing = probe(&requested, &available).unwrap_err();

        let expected = set(
            &["VK_EXT_debug_report", "VK_KHR_portability_enumeration"],
            &["VK_LAYER_KHRONOS_validation"],
        );
        assert_eq!(missing.extensions, expected.extensions);
        assert_eq!(missing.layers, expected.layers);
    }

    #[test]
    fn test_probe_missing_layer_only() {
        let available = set(&["VK_KHR_surface"], &[]);
        let missing = probe(&set(&["VK_KHR_surface"], &["VK_LAYER_KHRONOS_validation"]), &available).unwrap_err();
        assert!(missing.extensions.is_empty());
        assert_eq!(missing.layers.len(), 1);
    }

    #[test]
    fn test_check_support_against_runtime() {
        let runtime = MockRuntime::new();
        assert!(check_support(&runtime, &set(&["VK_KHR_surface"], &["VK_LAYER_KHRONOS_validation"])).is_ok());

        let err = check_support(&runtime, &set(&["VK_KHR_imaginary"], &[])).unwrap_err();
        match err {
            VulkanError::UnsupportedCapability(missing) => {
                assert_eq!(missing.extensions.into_iter().collect::<Vec<_>>(), vec!["VK_KHR_imaginary".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
