//! Spock demo application
//!
//! Opens a window, bootstraps Vulkan for it and polls events until the window
//! is closed. With `--init-only` the engine is torn down right after
//! initialization.
//!
//! Usage: `spock [config.toml|config.ron] [--init-only]`

use spock_engine::foundation::logging;
use spock_engine::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let init_only = args.iter().any(|arg| arg == "--init-only");
    let config_path = args.iter().find(|arg| !arg.starts_with("--"));

    let config = match config_path {
        Some(path) => SpockConfig::load_from_file(path)?,
        None => SpockConfig::default(),
    };

    logging::init(&config.logging.level)?;
    if let Some(path) = config_path {
        log::info!("Loaded configuration from {}", path);
    }

    let mut engine = Engine::new(&config)?;
    log::info!(
        "Running on {} ({})",
        engine.context().device_properties().name,
        engine.context().device_properties().device_type_name()
    );

    if !init_only {
        engine.run();
    }

    drop(engine);
    log::info!("Engine shut down");
    Ok(())
}
