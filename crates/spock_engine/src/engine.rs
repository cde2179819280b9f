//! Engine: a window plus the Vulkan context bound to it

use thiserror::Error;

use crate::config::{ConfigError, SpockConfig};
use crate::vulkan::{bootstrap, AshRuntime, BootstrapSettings, RenderContext, VulkanError};
use crate::window::{Window, WindowError};

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Window creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Vulkan bootstrap failed
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] VulkanError),
}

/// Main engine struct
///
/// The context is declared before the window so the surface is destroyed
/// while its window still exists.
pub struct Engine {
    context: RenderContext<AshRuntime>,
    window: Window,
}

impl Engine {
    /// Open the window and bootstrap Vulkan for it
    pub fn new(config: &SpockConfig) -> Result<Self, EngineError> {
        log::info!("Initializing Engine");
        config.validate()?;

        let mut window = Window::new(&config.window)?;
        let runtime = AshRuntime::load()?;
        let settings = BootstrapSettings::from_config(config);
        let context = bootstrap(runtime, &mut window, &settings)?;

        log::info!("Fully initialized Engine");
        Ok(Self { context, window })
    }

    /// The Vulkan context
    pub fn context(&self) -> &RenderContext<AshRuntime> {
        &self.context
    }

    /// Poll events until the window is closed or Escape is pressed
    pub fn run(&mut self) {
        log::info!("Entering event loop");
        while !self.window.should_close() {
            self.window.poll_events();
            let close_requested = self.window.flush_events().any(|(_, event)| {
                matches!(
                    event,
                    glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) | glfw::WindowEvent::Close
                )
            });
            if close_requested {
                self.window.set_should_close(true);
            }
        }
        log::info!("Event loop finished");
    }
}
