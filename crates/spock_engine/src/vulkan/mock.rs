//! In-memory runtime for exercising the bootstrap sequence without a GPU

use ash::vk;
use std::cell::RefCell;
use std::rc::Rc;

use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::runtime::{
    ApiVersion, DeviceProperties, DeviceRequest, InstanceRequest, Runtime, SurfaceSource, DEBUG_REPORT_EXTENSION,
    SWAPCHAIN_EXTENSION, VALIDATION_LAYER,
};
use crate::window::WindowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Instance,
    Diagnostics,
    Surface,
    Device,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Created(Resource),
    Destroyed(Resource),
}

/// Shared record of handle creation and destruction
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    fn record(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn created(&self) -> Vec<Resource> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Created(resource) => Some(resource),
                Event::Destroyed(_) => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<Resource> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Destroyed(resource) => Some(resource),
                Event::Created(_) => None,
            })
            .collect()
    }
}

/// Owned mock handle; records its own destruction
#[derive(Debug)]
pub struct MockHandle {
    resource: Resource,
    journal: Journal,
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.journal.record(Event::Destroyed(self.resource));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MockFamily {
    pub flags: vk::QueueFlags,
    pub queue_count: u32,
    pub present: bool,
}

impl MockFamily {
    pub fn graphics() -> Self {
        Self {
            flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER,
            queue_count: 1,
            present: false,
        }
    }

    pub fn present() -> Self {
        Self {
            flags: vk::QueueFlags::TRANSFER,
            queue_count: 1,
            present: true,
        }
    }

    pub fn both() -> Self {
        Self {
            flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER,
            queue_count: 16,
            present: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockGpu {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub extensions: Vec<String>,
    pub families: Vec<MockFamily>,
}

impl MockGpu {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            extensions: Vec::new(),
            families: Vec::new(),
        }
    }

    pub fn integrated(mut self) -> Self {
        self.device_type = vk::PhysicalDeviceType::INTEGRATED_GPU;
        self
    }

    pub fn with_extension(mut self, name: &str) -> Self {
        self.extensions.push(name.to_string());
        self
    }

    pub fn with_swapchain(self) -> Self {
        self.with_extension(SWAPCHAIN_EXTENSION)
    }

    pub fn with_family(mut self, family: MockFamily) -> Self {
        self.families.push(family);
        self
    }
}

pub struct MockRuntime {
    pub journal: Journal,
    pub version: ApiVersion,
    pub extensions: Vec<String>,
    pub layers: Vec<String>,
    pub gpus: Vec<MockGpu>,
    pub refuse_instance: bool,
    pub refuse_device: bool,
    pub debug_entry_points: bool,
    pub instance_requests: RefCell<Vec<InstanceRequest>>,
    pub device_requests: RefCell<Vec<DeviceRequest>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        let extensions = [
            "VK_KHR_surface",
            "VK_KHR_xcb_surface",
            DEBUG_REPORT_EXTENSION,
            "VK_KHR_portability_enumeration",
            "VK_KHR_get_physical_device_properties2",
        ];
        Self {
            journal: Journal::default(),
            version: ApiVersion::new(0, 1, 3, 0),
            extensions: extensions.iter().map(|name| name.to_string()).collect(),
            layers: vec![VALIDATION_LAYER.to_string()],
            gpus: Vec::new(),
            refuse_instance: false,
            refuse_device: false,
            debug_entry_points: true,
            instance_requests: RefCell::new(Vec::new()),
            device_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_gpu(mut self, gpu: MockGpu) -> Self {
        self.gpus.push(gpu);
        self
    }

    /// Create a handle outside the bootstrap sequence
    pub fn mock_handle(&self, resource: Resource) -> MockHandle {
        self.journal.record(Event::Created(resource));
        MockHandle {
            resource,
            journal: self.journal.clone(),
        }
    }
}

impl Runtime for MockRuntime {
    type Instance = MockHandle;
    type Diagnostics = MockHandle;
    type Surface = MockHandle;
    type Device = MockHandle;
    type PhysicalDevice = usize;
    type Queue = (u32, u32);

    fn instance_version(&self) -> VulkanResult<ApiVersion> {
        Ok(self.version)
    }

    fn available_extensions(&self) -> VulkanResult<Vec<String>> {
        Ok(self.extensions.clone())
    }

    fn available_layers(&self) -> VulkanResult<Vec<String>> {
        Ok(self.layers.clone())
    }

    fn create_instance(&self, request: &InstanceRequest) -> VulkanResult<MockHandle> {
        self.instance_requests.borrow_mut().push(request.clone());
        if self.refuse_instance {
            return Err(VulkanError::ContextCreationFailed(vk::Result::ERROR_INCOMPATIBLE_DRIVER));
        }
        Ok(self.mock_handle(Resource::Instance))
    }

    fn create_diagnostics(&self, _instance: &MockHandle) -> VulkanResult<MockHandle> {
        if !self.debug_entry_points {
            return Err(VulkanError::MissingOptionalEntryPoint {
                name: "vkCreateDebugReportCallbackEXT",
            });
        }
        Ok(self.mock_handle(Resource::Diagnostics))
    }

    fn enumerate_physical_devices(&self, _instance: &MockHandle) -> VulkanResult<Vec<usize>> {
        Ok((0..self.gpus.len()).collect())
    }

    fn device_properties(&self, _instance: &MockHandle, device: usize) -> DeviceProperties {
        let gpu = &self.gpus[device];
        DeviceProperties {
            name: gpu.name.clone(),
            api_version: self.version,
            driver_version: 1,
            vendor_id: 0x10de,
            device_id: 0x2000 + device as u32,
            device_type: gpu.device_type,
            pipeline_cache_uuid: [device as u8; vk::UUID_SIZE],
        }
    }

    fn device_extensions(&self, _instance: &MockHandle, device: usize) -> VulkanResult<Vec<String>> {
        Ok(self.gpus[device].extensions.clone())
    }

    fn queue_families(&self, _instance: &MockHandle, device: usize) -> Vec<vk::QueueFamilyProperties> {
        self.gpus[device]
            .families
            .iter()
            .map(|family| vk::QueueFamilyProperties {
                queue_flags: family.flags,
                queue_count: family.queue_count,
                ..Default::default()
            })
            .collect()
    }

    fn surface_support(&self, _instance: &MockHandle, device: usize, family_index: u32, _surface: &MockHandle) -> VulkanResult<bool> {
        Ok(self.gpus[device]
            .families
            .get(family_index as usize)
            .map_or(false, |family| family.present))
    }

    fn create_device(&self, _instance: &MockHandle, _device: usize, request: &DeviceRequest) -> VulkanResult<MockHandle> {
        self.device_requests.borrow_mut().push(request.clone());
        if self.refuse_device {
            return Err(VulkanError::LogicalContextCreationFailed(vk::Result::ERROR_FEATURE_NOT_PRESENT));
        }
        Ok(self.mock_handle(Resource::Device))
    }

    fn device_queue(&self, _device: &MockHandle, family_index: u32, queue_index: u32) -> (u32, u32) {
        (family_index, queue_index)
    }
}

/// Windowing collaborator stand-in
pub struct MockWindow {
    pub extensions: Vec<String>,
    pub fail_surface: bool,
}

impl MockWindow {
    pub fn new() -> Self {
        Self {
            extensions: vec!["VK_KHR_surface".to_string(), "VK_KHR_xcb_surface".to_string()],
            fail_surface: false,
        }
    }
}

impl SurfaceSource<MockRuntime> for MockWindow {
    fn required_instance_extensions(&self) -> VulkanResult<Vec<String>> {
        Ok(self.extensions.clone())
    }

    fn create_surface(&mut self, runtime: &MockRuntime, _instance: &MockHandle) -> VulkanResult<MockHandle> {
        if self.fail_surface {
            return Err(WindowError::SurfaceCreation(vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR).into());
        }
        Ok(runtime.mock_handle(Resource::Surface))
    }
}
