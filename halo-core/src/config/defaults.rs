//! Default configuration values for Halo Shell.
//!
//! These functions are used by `serde`'s `default` attribute in the configuration
//! structures to provide values when they are not specified in `config.toml`.

use std::path::PathBuf;

use super::types::{
    AppIndexConfig, LoggingConfig, NotificationsConfig, OptionsConfig, ThemingConfig,
};

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig::default()
}

/// `None` means "use `options.json` in the application config directory".
pub(crate) fn default_options_store_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_options_config() -> OptionsConfig {
    OptionsConfig::default()
}

pub(crate) fn default_theming_debounce_ms() -> u64 {
    300
}

/// Zero means "yield to the scheduler" between palette writes instead of sleeping.
pub(crate) fn default_theming_apply_stagger_ms() -> u64 {
    0
}

pub(crate) fn default_extractor_binary() -> String {
    "matugen".to_string()
}

pub(crate) fn default_theming_config() -> ThemingConfig {
    ThemingConfig::default()
}

pub(crate) fn default_max_notifications() -> usize {
    50
}

pub(crate) fn default_popup_timeout_ms() -> u64 {
    5000
}

pub(crate) fn default_transition_ms() -> u64 {
    200
}

pub(crate) fn default_dismiss_stagger_ms() -> u64 {
    50
}

pub(crate) fn default_dismiss_jitter_ms() -> u64 {
    20
}

pub(crate) fn default_notifications_config() -> NotificationsConfig {
    NotificationsConfig::default()
}

pub(crate) fn default_app_index_debounce_ms() -> u64 {
    500
}

pub(crate) fn default_application_directories() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
        PathBuf::from("/var/lib/flatpak/exports/share/applications"),
    ];
    if let Ok(data_dir) = crate::utils::paths::get_data_base_dir() {
        dirs.push(data_dir.join("applications"));
        dirs.push(data_dir.join("flatpak/exports/share/applications"));
    }
    dirs
}

pub(crate) fn default_app_index_config() -> AppIndexConfig {
    AppIndexConfig::default()
}
