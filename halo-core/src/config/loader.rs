//! Configuration Loading for Halo Shell.
//!
//! [`ConfigLoader::load`] reads `config.toml` from the application config
//! directory (or from the path named by the `HALO_SHELL_CONFIG` environment
//! variable), falls back to defaults when the file is absent, and validates
//! the result.
//!
//! ## Validation
//!
//! - Log level and format are normalised to lowercase and checked.
//! - Relative log file paths are resolved against the application state directory.
//! - Notification and theming windows must be usable (non-zero cap, etc).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV_VAR: &str = "HALO_SHELL_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the `CoreConfig` for the application.
    ///
    /// A missing file yields the default configuration. Read failures other
    /// than "not found" are returned as [`ConfigError::ReadError`]; malformed
    /// TOML as [`ConfigError::ParseError`].
    pub fn load() -> Result<CoreConfig, CoreError> {
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Resolves the configuration file path, honouring [`CONFIG_PATH_ENV_VAR`].
    pub fn config_path() -> Result<PathBuf, CoreError> {
        match env::var(CONFIG_PATH_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(get_app_config_dir()?.join(CONFIG_FILE_NAME)),
        }
    }

    /// Loads and validates a configuration file at an explicit path.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let config = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => CoreConfig::default(),
            Ok(content) => toml::from_str::<CoreConfig>(&content).map_err(ConfigError::ParseError)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration file at {:?}, using defaults", path);
                CoreConfig::default()
            }
            Err(e) => {
                return Err(ConfigError::ReadError { path: path.to_path_buf(), source: e }.into());
            }
        };
        Self::validate_config(config)
    }

    /// Normalises and validates a loaded configuration.
    pub fn validate_config(mut config: CoreConfig) -> Result<CoreConfig, CoreError> {
        config.logging.level = config.logging.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Expected one of {:?}",
                config.logging.level, VALID_LOG_LEVELS
            ))
            .into());
        }

        config.logging.format = config.logging.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log format '{}'. Expected one of {:?}",
                config.logging.format, VALID_LOG_FORMATS
            ))
            .into());
        }

        if let Some(file_path) = &config.logging.file_path {
            if file_path.is_relative() {
                config.logging.file_path = Some(get_app_state_dir()?.join(file_path));
            }
        }

        if config.notifications.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "notifications.max_entries must be greater than zero".to_string(),
            )
            .into());
        }

        if config.theming.extractor_binary.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "theming.extractor_binary cannot be empty".to_string(),
            )
            .into());
        }

        Ok(config)
    }
}
