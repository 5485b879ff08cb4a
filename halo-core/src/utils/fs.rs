//! Filesystem Utilities.
//!
//! Helpers that map `std::io::Error` into [`CoreError::Filesystem`] with the
//! offending path attached. The synchronous helper is used during startup
//! (logging setup); the async helpers back the persisted options document.

use std::fs;
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

fn fs_error(message: &str, path: &Path, source: std::io::Error) -> CoreError {
    CoreError::Filesystem { message: message.to_string(), path: path.to_path_buf(), source }
}

/// Ensures that a directory exists at the given path, creating parents as needed.
///
/// Fails if the path exists but is not a directory.
///
/// # Examples
///
/// ```no_run
/// # use halo_core::utils::fs::ensure_dir_exists;
/// let temp_dir = tempfile::tempdir().unwrap();
/// let dir_path = temp_dir.path().join("halo");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            Ok(())
        } else {
            Err(fs_error(
                "Path exists but is not a directory",
                path,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
            ))
        }
    } else {
        fs::create_dir_all(path).map_err(|e| fs_error("Failed to create directory", path, e))
    }
}

/// Makes sure `path` exists as a file, creating missing parents and writing
/// `initial` into a newly created file. Existing files are left untouched.
pub async fn ensure_file_exists(path: &Path, initial: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| fs_error("Failed to create parent directory", parent, e))?;
        }
    }
    match tokio::fs::OpenOptions::new().write(true).create_new(true).open(path).await {
        Ok(mut file) => {
            file.write_all(initial.as_bytes())
                .await
                .map_err(|e| fs_error("Failed to initialise file", path, e))?;
            file.flush().await.map_err(|e| fs_error("Failed to initialise file", path, e))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(fs_error("Failed to create file", path, e)),
    }
}

/// Reads the entire contents of a file into a string.
pub async fn read_to_string(path: &Path) -> Result<String, CoreError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| fs_error("Failed to read file", path, e))
}

/// Writes `content` to `path` by writing a sibling temporary file and renaming
/// it over the target, so readers never observe a half-written document.
pub async fn write_string_atomic(path: &Path, content: &str) -> Result<(), CoreError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CoreError::InvalidInput(format!("Path has no file name: {:?}", path)))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, content.as_bytes())
        .await
        .map_err(|e| fs_error("Failed to write temporary file", &tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| fs_error("Failed to replace file", path, e))
}
