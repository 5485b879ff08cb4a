use serde::{Deserialize, Serialize};

use super::types::{NotificationPhase, TerminalAction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationEvent {
    Added(u32),
    Updated(u32),
    /// Rejected by the blacklist before entering the collection.
    Blocked { id: u32, app_name: String },
    PhaseChanged { id: u32, phase: NotificationPhase },
    /// Left the collection. `action` is `None` when the daemon resolved it.
    Removed { id: u32, action: Option<TerminalAction> },
    /// Pushed out by the size cap.
    Evicted(u32),
}
