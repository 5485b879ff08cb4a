//! Halo Shell core process.
//!
//! [`shell::Shell`] owns the options tree, its persisted store and every
//! service built on top of it. The binary builds one and runs until Ctrl-C.

pub mod shell;

pub use shell::{LoggingDaemon, Shell};
