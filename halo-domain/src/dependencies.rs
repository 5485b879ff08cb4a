//! Runtime checks for external tools the shell shells out to.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::notifications::NotificationError;

/// Posts a desktop notification outside the shell's own notification flow.
#[async_trait]
pub trait DesktopNotifier: Send + Sync {
    async fn notify(&self, summary: &str, body: &str) -> Result<(), NotificationError>;
}

/// Sends notifications with `notify-send`.
#[derive(Debug, Clone, Default)]
pub struct NotifySendNotifier;

#[async_trait]
impl DesktopNotifier for NotifySendNotifier {
    async fn notify(&self, summary: &str, body: &str) -> Result<(), NotificationError> {
        let status = Command::new("notify-send")
            .args(["--urgency", "critical", summary, body])
            .status()
            .await
            .map_err(|e| NotificationError::Daemon(format!("notify-send could not be started: {}", e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(NotificationError::Daemon(format!("notify-send exited with {}", status)))
        }
    }
}

/// The binaries from `binaries` that cannot be found on `PATH`.
pub fn missing_binaries<'a>(binaries: &[&'a str]) -> Vec<&'a str> {
    binaries.iter().copied().filter(|bin| which::which(bin).is_err()).collect()
}

/// Returns `true` when every binary is available. Otherwise logs the missing
/// ones and tells the user through `notifier`; notifier failures are only logged.
pub async fn require(binaries: &[&str], notifier: &dyn DesktopNotifier) -> bool {
    let missing = missing_binaries(binaries);
    if missing.is_empty() {
        debug!("All required binaries present: {:?}", binaries);
        return true;
    }
    let list = missing.join(", ");
    warn!("Missing dependencies: {}", list);
    if let Err(e) = notifier.notify("Missing dependencies", &format!("Please install: {}", list)).await {
        warn!("Could not report missing dependencies: {}", e);
    }
    false
}
