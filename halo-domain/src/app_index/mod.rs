//! Installed-application cache.
//!
//! [`AppIndex`] holds the parsed `.desktop` entries of the configured
//! application directories; [`AppIndexWatcher`] keeps it current by
//! reindexing after filesystem changes settle.

pub mod entry;
pub mod errors;
pub mod index;
pub mod watcher;

pub use entry::{parse_desktop_entry, AppEntry};
pub use errors::AppIndexError;
pub use index::AppIndex;
pub use watcher::{AppIndexWatcher, ReindexDebouncer};
