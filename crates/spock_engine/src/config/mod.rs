//! Configuration system
//!
//! `SpockConfig` groups the application, window, Vulkan and logging settings.
//! Any type implementing [`Config`] can be loaded from and saved to TOML or
//! RON files; the format is picked from the file extension.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::vulkan::runtime::SWAPCHAIN_EXTENSION;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents do not match the configuration schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configuration could not be rendered
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The file extension names no known format
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// On-disk configuration formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format implied by the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse<T: DeserializeOwned>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Self::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string())),
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// A configuration type stored in a TOML or RON file
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Read and parse `path`
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        format.parse(&std::fs::read_to_string(path)?)
    }

    /// Render and write to `path`
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = ConfigFormat::from_path(path)?.render(self)?;
        Ok(std::fs::write(path, contents)?)
    }
}

/// Application identity reported to the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name
    pub name: String,
    /// Engine name
    pub engine_name: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "Spock Engine".to_string(),
            engine_name: crate::vulkan::context::DEFAULT_ENGINE_NAME.to_string(),
        }
    }
}

/// Window parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Whether the user may resize the window
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Spock Engine".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// Vulkan bootstrap parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VulkanConfig {
    /// Whether to enable validation; `None` follows the build type
    pub enable_validation: Option<bool>,
    /// Device extensions a GPU must support to be selected, on top of
    /// `VK_KHR_swapchain` which is always required
    pub required_device_extensions: Vec<String>,
}

impl VulkanConfig {
    /// Effective validation setting
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            enable_validation: None,
            required_device_extensions: vec![SWAPCHAIN_EXTENSION.to_string()],
        }
    }
}

/// Logging parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpockConfig {
    /// Application identity
    pub application: ApplicationConfig,
    /// Window parameters
    pub window: WindowConfig,
    /// Vulkan parameters
    pub vulkan: VulkanConfig,
    /// Logging parameters
    pub logging: LoggingConfig,
}

impl SpockConfig {
    /// Reject values the bootstrap cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application.name.is_empty() {
            return Err(ConfigError::Invalid("application name cannot be empty".to_string()));
        }
        if self.application.name.contains('\0') || self.application.engine_name.contains('\0') {
            return Err(ConfigError::Invalid("names cannot contain NUL bytes".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }
}

impl Config for SpockConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpockConfig::default();
        assert_eq!(config.application.name, "Spock Engine");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert!(!config.window.resizable);
        assert_eq!(config.vulkan.required_device_extensions, vec!["VK_KHR_swapchain"]);
        assert_eq!(config.vulkan.validation_enabled(), cfg!(debug_assertions));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SpockConfig = toml::from_str(
            r#"
            [window]
            title = "Bridge"

            [vulkan]
            enable_validation = false
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Bridge");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.vulkan.enable_validation, Some(false));
        assert!(!config.vulkan.validation_enabled());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_ron_parse() {
        let config: SpockConfig = ron::from_str("(logging: (level: \"debug\"), window: (width: 1024))").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("spock_config_{}.toml", std::process::id()));

        let mut config = SpockConfig::default();
        config.application.name = "Round Trip".to_string();
        config.save_to_file(&path).unwrap();
        let loaded = SpockConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_format() {
        let err = SpockConfig::default().save_to_file("spock.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

        // Rejected by extension before the file is opened
        let err = SpockConfig::load_from_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("spock.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("dir.d/spock.ron")).unwrap(), ConfigFormat::Ron);
        assert!(ConfigFormat::from_path(Path::new("toml")).is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = ConfigFormat::Toml.parse::<SpockConfig>("[window\nwidth = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SpockConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SpockConfig::default();
        config.application.name.clear();
        assert!(config.validate().is_err());
    }
}
