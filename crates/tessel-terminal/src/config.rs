//! Console configuration loaded from TOML.
//!
//! ```toml
//! width = 100
//! height = 30
//! background = "#101018"
//! foreground = "white"
//! ```
//!
//! Every key is optional; missing keys take the values of
//! [`ConsoleConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessel_core::Color;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a console configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse TOML in '{path}': {source}")]
    Parse {
        /// The file being parsed, or `<string>` for in-memory input.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is not usable.
    #[error("Invalid configuration value for '{key}': {message}")]
    Invalid {
        /// The offending key.
        key: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Dimensions and colors of a console session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
    /// Color the main surface is cleared with.
    pub background: String,
    /// Text color of the main surface's initial fill.
    pub foreground: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
            background: "#000000".to_string(),
            foreground: "#FFFFFF".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Creates a configuration with the given size and default colors.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading console config");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Checks that the size is non-zero and both colors parse.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 {
            return Err(invalid("width", "must be at least 1"));
        }
        if self.height == 0 {
            return Err(invalid("height", "must be at least 1"));
        }
        self.background_color()?;
        self.foreground_color()?;
        Ok(())
    }

    /// The parsed background color.
    pub fn background_color(&self) -> ConfigResult<Color> {
        Color::parse(&self.background).map_err(|e| invalid("background", &e.to_string()))
    }

    /// The parsed foreground color.
    pub fn foreground_color(&self) -> ConfigResult<Color> {
        Color::parse(&self.foreground).map_err(|e| invalid("foreground", &e.to_string()))
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}
