//! General Utilities for Halo Shell Core.
//!
//! # Submodules
//!
//! - [`async_utils`]: task spawning, timeouts and the [`CancelableTimer`] used
//!   for every debounce and auto-hide delay.
//! - [`fs`]: filesystem helpers returning [`crate::error::CoreError`].
//! - [`paths`]: XDG and application-specific directories.

pub mod async_utils;
pub mod fs;
pub mod paths;

pub use async_utils::{sleep, spawn_task, timeout, CancelableTimer};
pub use fs::{ensure_dir_exists, ensure_file_exists, read_to_string, write_string_atomic};
