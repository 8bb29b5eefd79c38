// src/config/loader.rs
//! TOML configuration loading

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::EmgConfig;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The named file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The file exists but is not valid TOML for [`EmgConfig`].
    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Any other I/O failure while reading.
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load configuration from a TOML file.
///
/// Missing keys fall back to their defaults; unknown keys are ignored.
pub fn load_config(path: &Path) -> Result<EmgConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::Io(err)
        }
    })?;
    let config = toml::from_str(&text)?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Load configuration from `path` when given, defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<EmgConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(EmgConfig::default()),
    }
}
