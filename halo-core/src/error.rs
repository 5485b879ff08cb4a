//! Error handling for the Halo Shell core layer.
//!
//! This module provides the error types shared by every Halo Shell crate.
//! They are defined with `thiserror` so that domain crates can wrap them
//! with `#[from]` and keep `?` propagation ergonomic.
//!
//! The main error type for this crate is [`CoreError`], which encapsulates
//! more specific errors like [`ConfigError`] and [`LoggingError`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use halo_core::error::CoreError;
//!
//! fn do_something_risky() -> Result<(), CoreError> {
//!     // If something goes wrong:
//!     // return Err(CoreError::Internal("Something went wrong".to_string()));
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Halo Shell.
///
/// This enum represents all possible errors that can occur in the core layer.
/// It is used as a common error type throughout the workspace, often by
/// wrapping more specific error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while setting up the logging system.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Errors related to filesystem operations, such as creating directories or
    /// reading files, that are not covered by configuration errors.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other specific variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors due to invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors within the core library.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` when the error was caused by a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Filesystem { source, .. } => source.kind() == io::ErrorKind::NotFound,
            CoreError::Io(source) => source.kind() == io::ErrorKind::NotFound,
            CoreError::Config(ConfigError::ReadError { source, .. }) => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values were parsed but are semantically invalid.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (e.g., XDG config home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Failed to install the global subscriber.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// Failed to set or parse a log filter (e.g., from a configuration string).
    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    /// An I/O error occurred during logging, such as failing to create a log directory.
    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}
