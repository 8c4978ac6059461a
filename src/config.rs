//! Configuration for the harp-version tool
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (HARP_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compat::{CompatibilityTable, SupportedDevice};
use crate::error::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "harp-version.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarpConfig {
    /// Logging configuration
    pub logging: LoggingSettings,

    /// Devices this host supports
    pub devices: Vec<SupportedDevice>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl HarpConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), devices = config.devices.len(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without applying overrides
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            message: e.message().to_string(),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // An explicit path must exist
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            dirs::config_dir()
                .map(|p| p.join("harp").join(CONFIG_FILE_NAME))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HARP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("HARP_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("HARP_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.is_empty() {
                return Err(Error::config_field_invalid(
                    "devices.name",
                    "Device name cannot be empty",
                ));
            }
            if !seen.insert((device.name.as_str(), device.id)) {
                return Err(Error::config_field_invalid(
                    "devices",
                    format!(
                        "Device '{}' is listed more than once with the same id",
                        device.name
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Build the supported device table
    pub fn compatibility_table(&self) -> CompatibilityTable {
        CompatibilityTable::new(self.devices.clone())
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("harp")
                .join(CONFIG_FILE_NAME)
        });

    if config_path.exists() && !force {
        return Err(Error::ConfigValidation {
            message: format!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                config_path.display()
            ),
            field: None,
        });
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# harp-version configuration

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.harp/logs/harp-version.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

# Supported devices. Versions may float: "1" accepts any 1.x.y,
# "1.2" accepts any 1.2.z, and an omitted version accepts anything.
#
# [[devices]]
# name = "Behavior"
# id = 1216
# hardware = "1"
# firmware = "2.3"
# assembly = "0"
"#
    .to_string()
}
