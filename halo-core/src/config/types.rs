//! Configuration Data Structures for Halo Shell.
//!
//! These structs describe the process-level configuration read from
//! `config.toml`. User-facing shell options (bar layout, theme colors,
//! notification blacklist, ...) are not part of this file; they live in the
//! reactive options tree of `halo-domain` and are persisted separately.
//!
//! Every struct applies defaults for missing fields via [`super::defaults`]
//! and rejects unknown fields with `#[serde(deny_unknown_fields)]`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use halo_core::config::LoggingConfig;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Valid values (case-insensitive): "trace", "debug", "info", "warn", "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// Valid values (case-insensitive): "text", "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::default_log_level(),
            file_path: defaults::default_log_file_path(),
            format: defaults::default_log_format(),
        }
    }
}

/// Where the user's option overrides are persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    #[serde(default = "defaults::default_options_store_path")]
    pub store_path: Option<PathBuf>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self { store_path: defaults::default_options_store_path() }
    }
}

/// Timing and tooling of the wallpaper theme pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemingConfig {
    #[serde(default = "defaults::default_theming_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "defaults::default_theming_apply_stagger_ms")]
    pub apply_stagger_ms: u64,
    #[serde(default = "defaults::default_extractor_binary")]
    pub extractor_binary: String,
}

impl ThemingConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn apply_stagger(&self) -> Duration {
        Duration::from_millis(self.apply_stagger_ms)
    }
}

impl Default for ThemingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::default_theming_debounce_ms(),
            apply_stagger_ms: defaults::default_theming_apply_stagger_ms(),
            extractor_binary: defaults::default_extractor_binary(),
        }
    }
}

/// Limits and timers of the notification lifecycle manager.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default = "defaults::default_max_notifications")]
    pub max_entries: usize,
    #[serde(default = "defaults::default_popup_timeout_ms")]
    pub popup_timeout_ms: u64,
    #[serde(default = "defaults::default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "defaults::default_dismiss_stagger_ms")]
    pub dismiss_stagger_ms: u64,
    #[serde(default = "defaults::default_dismiss_jitter_ms")]
    pub dismiss_jitter_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::default_max_notifications(),
            popup_timeout_ms: defaults::default_popup_timeout_ms(),
            transition_ms: defaults::default_transition_ms(),
            dismiss_stagger_ms: defaults::default_dismiss_stagger_ms(),
            dismiss_jitter_ms: defaults::default_dismiss_jitter_ms(),
        }
    }
}

/// Directories indexed for `.desktop` entries and the reindex debounce window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppIndexConfig {
    #[serde(default = "defaults::default_app_index_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "defaults::default_application_directories")]
    pub directories: Vec<PathBuf>,
}

impl AppIndexConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AppIndexConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::default_app_index_debounce_ms(),
            directories: defaults::default_application_directories(),
        }
    }
}

/// Root configuration structure for Halo Shell.
///
/// # Examples
///
/// ```
/// use halo_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [theming]
/// debounce_ms = 150
/// "#;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert_eq!(loaded.theming.debounce_ms, 150);
/// assert_eq!(loaded.notifications.max_entries, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_options_config")]
    pub options: OptionsConfig,
    #[serde(default = "defaults::default_theming_config")]
    pub theming: ThemingConfig,
    #[serde(default = "defaults::default_notifications_config")]
    pub notifications: NotificationsConfig,
    #[serde(default = "defaults::default_app_index_config")]
    pub app_index: AppIndexConfig,
}
