use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::NotificationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NotificationUrgency {
    Low,
    #[default]
    Normal,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: String,
    pub label: String,
}

impl NotificationAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

/// A notification as reported by the daemon. `id` is host-assigned and may
/// be reused once the previous holder is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: u32,
    pub app_name: String,
    #[serde(default)]
    pub app_icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_entry: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub urgency: NotificationUrgency,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl NotificationRecord {
    pub fn new(id: u32, app_name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id,
            app_name: app_name.into(),
            app_icon: String::new(),
            desktop_entry: None,
            summary: summary.into(),
            body: String::new(),
            urgency: NotificationUrgency::default(),
            timestamp: Utc::now(),
            actions: Vec::new(),
            image: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_desktop_entry(mut self, entry: impl Into<String>) -> Self {
        self.desktop_entry = Some(entry.into());
        self
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_urgency(mut self, urgency: NotificationUrgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn action(&self, action_id: &str) -> Result<&NotificationAction, NotificationError> {
        self.actions.iter().find(|a| a.id == action_id).ok_or_else(|| NotificationError::ActionNotFound {
            notification_id: self.id,
            action_id: action_id.to_string(),
        })
    }
}

/// Where an entry is being shown. History entries never auto-hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DisplayContext {
    #[default]
    Popup,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationPhase {
    Hidden,
    Visible,
    Hiding,
}

/// What happens once an entry finishes hiding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalAction {
    /// Auto-hide timeout; the daemon is not told.
    Expire,
    Dismiss,
    Invoke(String),
}

/// Snapshot of one managed notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEntry {
    pub record: NotificationRecord,
    pub phase: NotificationPhase,
    pub context: DisplayContext,
    pub hovered: bool,
    pub pending_action: Option<TerminalAction>,
}
