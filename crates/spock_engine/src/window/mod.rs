//! Window management using GLFW
//!
//! Provides the window the Vulkan surface is created for, the instance
//! extensions GLFW needs, and event polling.

use ash::vk;
use thiserror::Error;

use crate::config::WindowConfig;
use crate::vulkan::ash_runtime::{AshRuntime, Instance, Surface};
use crate::vulkan::runtime::SurfaceSource;
use crate::vulkan::VulkanResult;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialised
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// GLFW refused to create the window
    #[error("Window creation failed")]
    CreationFailed,

    /// GLFW cannot report the Vulkan instance extensions it needs
    #[error("GLFW reports no Vulkan support on this system")]
    VulkanUnsupported,

    /// GLFW failed to create the surface
    #[error("Failed to create Vulkan surface: {0:?}")]
    SurfaceCreation(vk::Result),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window configured for Vulkan (no client API)
pub struct Window {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
}

impl Window {
    /// Initialise GLFW and open a window
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        log::info!("Building GLFW window");

        let mut glfw = glfw::init(glfw::fail_on_errors).map_err(|_| WindowError::InitializationFailed)?;

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);

        log::info!("GLFW {}x{} window \"{}\" created", config.width, config.height, config.title);

        Ok(Self { window, events, glfw })
    }

    /// The user or the application asked the window to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Request or cancel closing
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Process pending window system events
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
    }

    /// Events received since the last flush
    pub fn flush_events(&self) -> glfw::FlushedMessages<(f64, glfw::WindowEvent)> {
        glfw::flush_messages(&self.events)
    }

    /// Vulkan instance extensions GLFW needs for surface creation
    pub fn required_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::VulkanUnsupported)
    }
}

impl SurfaceSource<AshRuntime> for Window {
    fn required_instance_extensions(&self) -> VulkanResult<Vec<String>> {
        Ok(self.required_extensions()?)
    }

    fn create_surface(&mut self, _runtime: &AshRuntime, instance: &Instance) -> VulkanResult<Surface> {
        instance.adopt_surface(|raw_instance| {
            let mut surface = vk::SurfaceKHR::null();
            let result = self.window.create_window_surface(raw_instance, std::ptr::null(), &mut surface);
            if result == vk::Result::SUCCESS {
                Ok(surface)
            } else {
                Err(WindowError::SurfaceCreation(result).into())
            }
        })
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        log::info!("Closing GLFW window");
    }
}
