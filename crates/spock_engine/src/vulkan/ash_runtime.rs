//! `ash` implementation of the runtime
//!
//! Every owned Vulkan handle is wrapped in a type whose `Drop` performs its
//! single destroy call. Wrappers carry what they need to destroy themselves
//! (function pointers, parent handle) so they never reach back into a parent
//! wrapper during teardown.

use ash::extensions::khr;
use ash::{vk, Entry};
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use crate::vulkan::diagnostics;
use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::runtime::{c_chars_to_string, ApiVersion, DeviceProperties, DeviceRequest, InstanceRequest, Runtime};

const CREATE_DEBUG_REPORT_CALLBACK: &str = "vkCreateDebugReportCallbackEXT";
const DESTROY_DEBUG_REPORT_CALLBACK: &str = "vkDestroyDebugReportCallbackEXT";
const DESTROY_SURFACE: &str = "vkDestroySurfaceKHR";

/// Optional instance-level entry points, resolved once at instance creation
#[derive(Clone, Copy)]
pub struct InstanceEntryPoints {
    /// `vkCreateDebugReportCallbackEXT`
    pub create_debug_report_callback: Option<vk::PFN_vkCreateDebugReportCallbackEXT>,
    /// `vkDestroyDebugReportCallbackEXT`
    pub destroy_debug_report_callback: Option<vk::PFN_vkDestroyDebugReportCallbackEXT>,
    /// `vkDestroySurfaceKHR`
    pub destroy_surface: Option<vk::PFN_vkDestroySurfaceKHR>,
}

fn lookup(entry: &Entry, instance: vk::Instance, name: &str) -> vk::PFN_vkVoidFunction {
    let name = CString::new(name).ok()?;
    // SAFETY: `instance` is a live instance created from `entry`
    unsafe { entry.get_instance_proc_addr(instance, name.as_ptr()) }
}

impl InstanceEntryPoints {
    fn resolve(entry: &Entry, instance: vk::Instance) -> Self {
        // SAFETY: each name is looked up with the signature the registry
        // defines for it, so the transmutes only restore the erased type
        unsafe {
            Self {
                create_debug_report_callback: lookup(entry, instance, CREATE_DEBUG_REPORT_CALLBACK)
                    .map(|f| std::mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkCreateDebugReportCallbackEXT>(f)),
                destroy_debug_report_callback: lookup(entry, instance, DESTROY_DEBUG_REPORT_CALLBACK)
                    .map(|f| std::mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkDestroyDebugReportCallbackEXT>(f)),
                destroy_surface: lookup(entry, instance, DESTROY_SURFACE)
                    .map(|f| std::mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkDestroySurfaceKHR>(f)),
            }
        }
    }
}

/// Owned `VkInstance`
pub struct Instance {
    raw: ash::Instance,
    surface_loader: khr::Surface,
    entry_points: InstanceEntryPoints,
    // Keeps the loader library mapped for as long as the instance lives
    _entry: Entry,
}

impl Instance {
    /// The `ash` instance
    pub fn raw(&self) -> &ash::Instance {
        &self.raw
    }

    /// Raw instance handle
    pub fn handle(&self) -> vk::Instance {
        self.raw.handle()
    }

    /// Entry points resolved at creation
    pub fn entry_points(&self) -> &InstanceEntryPoints {
        &self.entry_points
    }

    /// `VK_KHR_surface` query functions
    pub fn surface_loader(&self) -> &khr::Surface {
        &self.surface_loader
    }

    /// Take ownership of a surface produced by `create`
    ///
    /// The destroy entry point is checked before `create` runs, so a surface is
    /// never created that could not be destroyed.
    pub fn adopt_surface<F>(&self, create: F) -> VulkanResult<Surface>
    where
        F: FnOnce(vk::Instance) -> VulkanResult<vk::SurfaceKHR>,
    {
        let destroy = self
            .entry_points
            .destroy_surface
            .ok_or(VulkanError::MissingOptionalEntryPoint { name: DESTROY_SURFACE })?;
        let raw = create(self.handle())?;
        log::info!("Created Vulkan surface");
        Ok(Surface {
            raw,
            instance: self.handle(),
            destroy,
        })
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan instance");
        // SAFETY: every child object is owned by a wrapper that is dropped first
        unsafe {
            self.raw.destroy_instance(None);
        }
    }
}

/// Owned `VkDebugReportCallbackEXT`
pub struct DebugReportSink {
    raw: vk::DebugReportCallbackEXT,
    instance: vk::Instance,
    destroy: vk::PFN_vkDestroyDebugReportCallbackEXT,
}

impl Drop for DebugReportSink {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan debug report callback");
        // SAFETY: the owning instance outlives this sink
        unsafe {
            (self.destroy)(self.instance, self.raw, ptr::null());
        }
    }
}

/// Owned `VkSurfaceKHR`
pub struct Surface {
    raw: vk::SurfaceKHR,
    instance: vk::Instance,
    destroy: vk::PFN_vkDestroySurfaceKHR,
}

impl Surface {
    /// Raw surface handle
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.raw
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan surface");
        // SAFETY: the owning instance outlives this surface
        unsafe {
            (self.destroy)(self.instance, self.raw, ptr::null());
        }
    }
}

/// Owned `VkDevice`
pub struct LogicalDevice {
    raw: ash::Device,
}

impl LogicalDevice {
    /// The `ash` device
    pub fn raw(&self) -> &ash::Device {
        &self.raw
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        log::info!("Destroying Vulkan logical device");
        // SAFETY: queues are plain handles; nothing else references the device
        unsafe {
            let _ = self.raw.device_wait_idle();
            self.raw.destroy_device(None);
        }
    }
}

fn c_strings(names: &[String]) -> Vec<CString> {
    names
        .iter()
        .filter_map(|name| CString::new(name.as_str()).ok())
        .collect()
}

fn pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

/// Runtime backed by the system Vulkan loader
pub struct AshRuntime {
    entry: Entry,
}

impl AshRuntime {
    /// Load the system Vulkan loader
    pub fn load() -> VulkanResult<Self> {
        // SAFETY: loading the loader runs its initialisers; nothing else is shared
        let entry = unsafe { Entry::load() }.map_err(|e| VulkanError::LoaderUnavailable(format!("{:?}", e)))?;
        Ok(Self { entry })
    }
}

impl Runtime for AshRuntime {
    type Instance = Instance;
    type Diagnostics = DebugReportSink;
    type Surface = Surface;
    type Device = LogicalDevice;
    type PhysicalDevice = vk::PhysicalDevice;
    type Queue = vk::Queue;

    #[allow(unused_unsafe)]
    fn instance_version(&self) -> VulkanResult<ApiVersion> {
        let version = unsafe { self.entry.try_enumerate_instance_version() }?;
        Ok(version.map_or(ApiVersion::V1_0, ApiVersion))
    }

    #[allow(unused_unsafe)]
    fn available_extensions(&self) -> VulkanResult<Vec<String>> {
        let properties = unsafe { self.entry.enumerate_instance_extension_properties(None) }?;
        Ok(properties
            .iter()
            .map(|p| c_chars_to_string(&p.extension_name))
            .collect())
    }

    #[allow(unused_unsafe)]
    fn available_layers(&self) -> VulkanResult<Vec<String>> {
        let properties = unsafe { self.entry.enumerate_instance_layer_properties() }?;
        Ok(properties.iter().map(|p| c_chars_to_string(&p.layer_name)).collect())
    }

    fn create_instance(&self, request: &InstanceRequest) -> VulkanResult<Instance> {
        let application_name = CString::new(request.application_name.as_str())
            .map_err(|_| VulkanError::ContextCreationFailed(vk::Result::ERROR_INITIALIZATION_FAILED))?;
        let engine_name = CString::new(request.engine_name.as_str())
            .map_err(|_| VulkanError::ContextCreationFailed(vk::Result::ERROR_INITIALIZATION_FAILED))?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&application_name)
            .application_version(request.version.0)
            .engine_name(&engine_name)
            .engine_version(request.version.0)
            .api_version(request.version.0);

        let extensions = c_strings(&request.extensions);
        let extension_ptrs = pointers(&extensions);
        let layers = c_strings(&request.layers);
        let layer_ptrs = pointers(&layers);

        let create_info = vk::InstanceCreateInfo::builder()
            .flags(request.flags)
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        // SAFETY: every pointer in `create_info` borrows a local that outlives the call
        let raw = unsafe { self.entry.create_instance(&create_info, None) }
            .map_err(VulkanError::ContextCreationFailed)?;

        let entry_points = InstanceEntryPoints::resolve(&self.entry, raw.handle());
        let surface_loader = khr::Surface::new(&self.entry, &raw);

        Ok(Instance {
            raw,
            surface_loader,
            entry_points,
            _entry: self.entry.clone(),
        })
    }

    fn create_diagnostics(&self, instance: &Instance) -> VulkanResult<DebugReportSink> {
        let points = instance.entry_points();
        let create = points
            .create_debug_report_callback
            .ok_or(VulkanError::MissingOptionalEntryPoint { name: CREATE_DEBUG_REPORT_CALLBACK })?;
        let destroy = points
            .destroy_debug_report_callback
            .ok_or(VulkanError::MissingOptionalEntryPoint { name: DESTROY_DEBUG_REPORT_CALLBACK })?;

        let create_info = vk::DebugReportCallbackCreateInfoEXT::builder()
            .flags(diagnostics::report_flags())
            .pfn_callback(Some(diagnostics::debug_report_callback));

        let mut raw = vk::DebugReportCallbackEXT::null();
        // SAFETY: `create` was resolved from this instance
        let result = unsafe { create(instance.handle(), &*create_info, ptr::null(), &mut raw) };
        if result != vk::Result::SUCCESS {
            return Err(VulkanError::Api(result));
        }

        Ok(DebugReportSink {
            raw,
            instance: instance.handle(),
            destroy,
        })
    }

    fn enumerate_physical_devices(&self, instance: &Instance) -> VulkanResult<Vec<vk::PhysicalDevice>> {
        // SAFETY: the instance is alive for the duration of the call
        Ok(unsafe { instance.raw().enumerate_physical_devices() }?)
    }

    fn device_properties(&self, instance: &Instance, device: vk::PhysicalDevice) -> DeviceProperties {
        // SAFETY: `device` was enumerated from `instance`
        let properties = unsafe { instance.raw().get_physical_device_properties(device) };
        DeviceProperties::from(&properties)
    }

    fn device_extensions(&self, instance: &Instance, device: vk::PhysicalDevice) -> VulkanResult<Vec<String>> {
        // SAFETY: `device` was enumerated from `instance`
        let properties = unsafe { instance.raw().enumerate_device_extension_properties(device) }?;
        let names: Vec<String> = properties
            .iter()
            .map(|p| c_chars_to_string(&p.extension_name))
            .collect();
        log::debug!("Available Vulkan device extensions: {:?}", names);
        Ok(names)
    }

    fn queue_families(&self, instance: &Instance, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        // SAFETY: `device` was enumerated from `instance`
        unsafe { instance.raw().get_physical_device_queue_family_properties(device) }
    }

    fn surface_support(
        &self,
        instance: &Instance,
        device: vk::PhysicalDevice,
        family_index: u32,
        surface: &Surface,
    ) -> VulkanResult<bool> {
        // SAFETY: device and surface both belong to `instance`
        Ok(unsafe {
            instance
                .surface_loader()
                .get_physical_device_surface_support(device, family_index, surface.handle())
        }?)
    }

    fn create_device(
        &self,
        instance: &Instance,
        device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VulkanResult<LogicalDevice> {
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = request
            .queues
            .iter()
            .map(|queue| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue.family_index)
                    .queue_priorities(&queue.priorities)
                    .build()
            })
            .collect();

        let extensions = c_strings(&request.extensions);
        let extension_ptrs = pointers(&extensions);
        let layers = c_strings(&request.layers);
        let layer_ptrs = pointers(&layers);
        let features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&features);

        // SAFETY: every pointer in `create_info` borrows data that outlives the call
        let raw = unsafe { instance.raw().create_device(device, &create_info, None) }
            .map_err(VulkanError::LogicalContextCreationFailed)?;

        Ok(LogicalDevice { raw })
    }

    fn device_queue(&self, device: &LogicalDevice, family_index: u32, queue_index: u32) -> vk::Queue {
        // SAFETY: the family was part of the device's queue requests
        unsafe { device.raw().get_device_queue(family_index, queue_index) }
    }
}
