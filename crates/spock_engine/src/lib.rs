//! # Spock Engine
//!
//! Vulkan context bootstrap: from "is there a Vulkan runtime at all" to a
//! logical device with graphics and present queues bound to a window surface,
//! with symmetric teardown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spock_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SpockConfig::default();
//!     let mut engine = Engine::new(&config)?;
//!     engine.run();
//!     Ok(())
//! }
//! ```
//!
//! The bootstrap sequence itself is generic over [`vulkan::Runtime`] and
//! [`vulkan::SurfaceSource`], see [`vulkan::bootstrap`].

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod vulkan;
pub mod window;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SpockConfig},
        vulkan::{bootstrap, AshRuntime, BootstrapSettings, RenderContext, VulkanError, VulkanResult},
        window::Window,
        Engine, EngineError,
    };
}
