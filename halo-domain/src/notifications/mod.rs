//! Notification lifecycle.

pub mod daemon;
pub mod errors;
pub mod events;
pub mod manager;
pub mod types;

pub use daemon::NotificationDaemon;
pub use errors::NotificationError;
pub use events::NotificationEvent;
pub use manager::{ManagerSettings, NotificationManager, BLACKLIST_OPTION, DND_OPTION};
pub use types::{
    DisplayContext, NotificationAction, NotificationEntry, NotificationPhase, NotificationRecord,
    NotificationUrgency, TerminalAction,
};
