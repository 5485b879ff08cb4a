//! Domain layer for Halo Shell.
//!
//! Everything here is shell logic without any rendering: the reactive options
//! tree the widgets bind to, and the services that derive state from the
//! system and feed it back into that tree.
//!
//! - [`options`]: observable option cells, the options tree built from the
//!   compiled-in schema, dependency-scoped handlers and the JSON override store.
//! - [`theming`]: the debounced wallpaper → palette → theme cells pipeline.
//! - [`notifications`]: the notification collection and per-entry lifecycle timers.
//! - [`app_index`]: the installed-application cache and its directory watcher.
//! - [`dependencies`]: checks for the external tools the services invoke.
//!
//! Services are plain values constructed by the caller; none of them is a
//! global. The `halo-shell` binary is the composition root.

// Re-export core crate
pub use halo_core as core;

pub mod app_index;
pub mod dependencies;
pub mod error;
pub mod notifications;
pub mod options;
pub mod theming;

pub use app_index::{AppEntry, AppIndex, AppIndexError, AppIndexWatcher};
pub use dependencies::{require, DesktopNotifier, NotifySendNotifier};
pub use error::{DomainError, DomainResult};
pub use notifications::{
    ManagerSettings, NotificationDaemon, NotificationError, NotificationEvent, NotificationManager,
    NotificationRecord,
};
pub use options::{set_handler, HandlerSubscription, Opt, OptionPath, OptionsError, OptionsStore, OptionsTree};
pub use theming::{ColorExtractor, MatugenExtractor, PipelineSettings, ThemePipeline, ThemingError};
