//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Paths are resolved with `directories-next`. All functions return
//! `Result<PathBuf, CoreError>` and yield
//! [`CoreError::Config(ConfigError::DirectoryUnavailable)`] when the base
//! directory cannot be determined (for example when `HOME` is unset).
//!
//! Application directories are derived from [`APPLICATION`], so the
//! configuration lands in e.g. `~/.config/halo-shell`.

use std::path::PathBuf;

use directories_next::{BaseDirs, ProjectDirs};

use crate::error::{ConfigError, CoreError};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "";
/// Application name used for every per-user directory.
pub const APPLICATION: &str = "halo-shell";

const OPTIONS_FILE_NAME: &str = "options.json";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable { dir_type: dir_type.to_string() })
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Returns `$XDG_DATA_HOME` (e.g. `~/.local/share`).
///
/// # Examples
/// ```
/// match halo_core::utils::paths::get_data_base_dir() {
///     Ok(path) => println!("Data base directory: {}", path.display()),
///     Err(e) => eprintln!("Error getting data base dir: {}", e),
/// }
/// ```
pub fn get_data_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| unavailable("Data Base"))
}

/// Returns `$XDG_STATE_HOME`, falling back to `$HOME/.local/state` on Linux.
///
/// `directories-next` has no state directory on `BaseDirs`, so non-Linux
/// targets use the local data directory instead.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Returns the application configuration directory, e.g. `~/.config/halo-shell`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("App Config"))
}

/// Returns the application state directory, e.g. `~/.local/state/halo-shell`.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base| base.join(APPLICATION))
}

/// Default location of the persisted options document.
pub fn get_default_options_store_path() -> Result<PathBuf, CoreError> {
    get_app_config_dir().map(|dir| dir.join(OPTIONS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dirs_are_named_after_application() {
        if let Ok(config_dir) = get_app_config_dir() {
            assert!(config_dir.to_string_lossy().contains(APPLICATION));
        }
    }

    #[test]
    fn test_app_state_dir_is_below_state_base() {
        if let (Ok(base), Ok(app)) = (get_state_base_dir(), get_app_state_dir()) {
            assert_eq!(app, base.join(APPLICATION));
        }
    }

    #[test]
    fn test_default_options_store_path() {
        if let Ok(path) = get_default_options_store_path() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("options.json"));
            assert_eq!(path.parent().map(PathBuf::from), get_app_config_dir().ok());
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_state_base_dir_falls_back_to_home() {
        if std::env::var("XDG_STATE_HOME").map(|v| v.is_empty()).unwrap_or(true) {
            if let (Ok(state), Some(base)) = (get_state_base_dir(), BaseDirs::new()) {
                assert_eq!(state, base.home_dir().join(".local/state"));
            }
        }
    }
}
