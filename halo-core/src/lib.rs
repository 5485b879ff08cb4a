//! Halo Shell Core Library (`halo-core`)
//!
//! Foundation shared by every Halo Shell crate: error types, process
//! configuration, logging and small filesystem/async helpers. It carries no
//! shell semantics of its own; the reactive options tree and the services
//! built on it live in `halo-domain`.
//!
//! ## Modules
//!
//! - [`error`]: [`CoreError`] and its specialised enums ([`ConfigError`], [`LoggingError`]).
//! - [`config`]: TOML configuration ([`CoreConfig`]) and its [`ConfigLoader`].
//! - [`logging`]: `tracing` subscriber setup (console plus optional rolling file).
//! - [`utils`]: XDG paths, filesystem helpers and [`utils::CancelableTimer`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use halo_core::{config::ConfigLoader, logging};
//!
//! logging::init_minimal_logging();
//! let config = ConfigLoader::load()?;
//! logging::init_logging(&config.logging, true)?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
