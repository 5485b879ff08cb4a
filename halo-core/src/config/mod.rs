//! Configuration Management for Halo Shell.
//!
//! ## Key Components:
//!
//! - [`types`]: configuration structs ([`CoreConfig`], [`LoggingConfig`], and
//!   one section per service).
//! - [`defaults`]: default values referenced by `serde(default = ...)`.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates `config.toml`.
//!
//! ## Configuration Loading Process:
//!
//! 1. `ConfigLoader::load()` resolves `config.toml` in the application config
//!    directory, or the file named by `HALO_SHELL_CONFIG`.
//! 2. A missing or empty file yields `CoreConfig::default()`.
//! 3. TOML is parsed into `CoreConfig`; errors map to [`crate::error::ConfigError::ParseError`].
//! 4. The result is validated and normalised.
//!
//! # Examples
//!
//! ```rust,ignore
//! use halo_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Loaded log level: {}", config.logging.level),
//!     Err(e) => {
//!         halo_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub(crate) mod defaults;
pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, CONFIG_PATH_ENV_VAR};
pub use types::{
    AppIndexConfig, CoreConfig, LoggingConfig, NotificationsConfig, OptionsConfig, ThemingConfig,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.theming, ThemingConfig::default());
        assert_eq!(config.notifications, NotificationsConfig::default());
    }

    #[test]
    fn test_core_config_deserialize_minimal_json() {
        let json_data = r#"{ "logging": { "level": "debug" } }"#;
        let config: CoreConfig = serde_json::from_str(json_data).expect("Failed to deserialize CoreConfig");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.notifications.dismiss_stagger_ms, 50);
    }
}
