use async_trait::async_trait;

use super::errors::NotificationError;

/// Requests the manager sends back to the notification daemon.
#[async_trait]
pub trait NotificationDaemon: Send + Sync {
    async fn dismiss(&self, id: u32) -> Result<(), NotificationError>;

    async fn invoke(&self, id: u32, action_id: &str) -> Result<(), NotificationError>;
}
