use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification with ID '{0}' not found.")]
    NotFound(u32),

    #[error("Action '{action_id}' not found for notification ID '{notification_id}'.")]
    ActionNotFound { notification_id: u32, action_id: String },

    #[error("Notification daemon request failed: {0}")]
    Daemon(String),
}
