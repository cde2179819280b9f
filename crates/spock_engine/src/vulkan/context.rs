//! Vulkan context bootstrap
//!
//! Runs the acquisition sequence
//!
//! ```text
//! instance -> diagnostics (debug only) -> surface -> physical device
//!          -> queue families -> logical device -> queues
//! ```
//!
//! and owns everything it created. Teardown is the exact reverse:
//! logical device, surface, diagnostics, instance.
//!
//! The order is enforced by the language rather than by call sequencing:
//! while bootstrapping, every handle is a local and locals drop in reverse
//! declaration order on any early return; afterwards, [`RenderContext`]
//! declares its owned fields in destruction order and struct fields drop in
//! declaration order.

use crate::config::SpockConfig;
use crate::vulkan::diagnostics;
use crate::vulkan::error::VulkanResult;
use crate::vulkan::instance;
use crate::vulkan::logical_device::{self, QueueHandles};
use crate::vulkan::physical_device::{self, DeviceSelection};
use crate::vulkan::platform::Platform;
use crate::vulkan::queue_family::{self, ResolvedQueueFamilies};
use crate::vulkan::runtime::{DeviceProperties, Runtime, SurfaceSource, SWAPCHAIN_EXTENSION};

/// Default engine name reported to the driver
pub const DEFAULT_ENGINE_NAME: &str = "Doing it the hard way";

/// Inputs of the bootstrap sequence
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapSettings {
    /// Application name reported to the driver
    pub application_name: String,
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Enables validation layers, the debug-report extension and the diagnostics sink
    pub enable_validation: bool,
    /// Platform the capability table is resolved for
    pub platform: Platform,
    /// Extra device extensions a physical device must support to be selected,
    /// on top of `VK_KHR_swapchain`
    pub required_device_extensions: Vec<String>,
}

impl BootstrapSettings {
    /// Settings for `application_name` on the current platform
    ///
    /// Validation follows the build type.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            engine_name: DEFAULT_ENGINE_NAME.to_string(),
            enable_validation: cfg!(debug_assertions),
            platform: Platform::current(),
            required_device_extensions: vec![SWAPCHAIN_EXTENSION.to_string()],
        }
    }

    /// Resolve settings from the loaded configuration
    pub fn from_config(config: &SpockConfig) -> Self {
        Self {
            application_name: config.application.name.clone(),
            engine_name: config.application.engine_name.clone(),
            enable_validation: config.vulkan.validation_enabled(),
            platform: Platform::current(),
            required_device_extensions: config.vulkan.required_device_extensions.clone(),
        }
    }

    /// Device extensions a candidate must support, swapchain first
    ///
    /// The swapchain extension is always required, whatever the configured
    /// list holds.
    pub fn device_extensions(&self) -> Vec<String> {
        let mut extensions = vec![SWAPCHAIN_EXTENSION.to_string()];
        for name in &self.required_device_extensions {
            instance::push_unique(&mut extensions, name);
        }
        extensions
    }

    /// Enable or disable validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = enabled;
        self
    }

    /// Override the detected platform
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

/// A ready-to-render Vulkan context
///
/// Field order is teardown order.
pub struct RenderContext<R: Runtime> {
    queues: QueueHandles<R::Queue>,
    queue_families: ResolvedQueueFamilies,
    physical_device: DeviceSelection<R::PhysicalDevice>,
    device: R::Device,
    surface: R::Surface,
    diagnostics: Option<R::Diagnostics>,
    instance: R::Instance,
    runtime: R,
}

impl<R: Runtime> RenderContext<R> {
    /// Runtime the context was created with
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Instance handle
    pub fn instance(&self) -> &R::Instance {
        &self.instance
    }

    /// Diagnostics sink, present only with validation enabled
    pub fn diagnostics(&self) -> Option<&R::Diagnostics> {
        self.diagnostics.as_ref()
    }

    /// Presentation surface
    pub fn surface(&self) -> &R::Surface {
        &self.surface
    }

    /// Selected physical device
    pub fn physical_device(&self) -> R::PhysicalDevice {
        self.physical_device.device
    }

    /// Properties of the selected physical device
    pub fn device_properties(&self) -> &DeviceProperties {
        &self.physical_device.properties
    }

    /// Full selection outcome, including rejected candidates
    pub fn device_selection(&self) -> &DeviceSelection<R::PhysicalDevice> {
        &self.physical_device
    }

    /// Logical device
    pub fn device(&self) -> &R::Device {
        &self.device
    }

    /// Resolved graphics and present families
    pub fn queue_families(&self) -> ResolvedQueueFamilies {
        self.queue_families
    }

    /// Graphics and present queues
    pub fn queues(&self) -> QueueHandles<R::Queue> {
        self.queues
    }

    /// Graphics queue
    pub fn graphics_queue(&self) -> R::Queue {
        self.queues.graphics
    }

    /// Present queue
    pub fn present_queue(&self) -> R::Queue {
        self.queues.present
    }
}

impl<R: Runtime> Drop for RenderContext<R> {
    fn drop(&mut self) {
        log::info!("Tearing down Vulkan context");
    }
}

/// Acquire a ready-to-render context for `window`
///
/// On failure everything acquired so far is released in reverse order before
/// the error is returned. Nothing is retried.
pub fn bootstrap<R, W>(runtime: R, window: &mut W, settings: &BootstrapSettings) -> VulkanResult<RenderContext<R>>
where
    R: Runtime,
    W: SurfaceSource<R>,
{
    log::info!(
        "Bootstrapping Vulkan (validation: {}, platform: {:?})",
        settings.enable_validation,
        settings.platform
    );

    let instance = instance::create_instance(&runtime, window, settings)?;
    let diagnostics = diagnostics::attach(&runtime, &instance, settings.enable_validation)?;
    let surface = window.create_surface(&runtime, &instance)?;

    let selection = physical_device::select_physical_device(
        &runtime,
        &instance,
        &settings.device_extensions(),
        settings.enable_validation,
    )?;
    let queue_families = queue_family::find_queue_families(&runtime, &instance, selection.device, &surface)?;

    let device =
        logical_device::create_logical_device(&runtime, &instance, selection.device, &queue_families, settings)?;
    let queues = logical_device::get_queues(&runtime, &instance, selection.device, &device, &surface, &queue_families)?;

    log::info!("Vulkan context ready on {}", selection.properties.name);

    Ok(RenderContext {
        queues,
        queue_families,
        physical_device: selection,
        device,
        surface,
        diagnostics,
        instance,
        runtime,
    })
}
