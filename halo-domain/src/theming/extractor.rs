//! External color extraction.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use halo_core::utils::async_utils::timeout;
use tokio::process::Command;
use tracing::debug;

use super::errors::ThemingError;
use super::palette::ExtractorOutput;

/// Derives light and dark palettes from an image.
#[async_trait]
pub trait ColorExtractor: Send + Sync {
    /// Whether the tool can be invoked at all.
    async fn is_available(&self) -> bool;

    async fn extract(&self, image: &Path) -> Result<ExtractorOutput, ThemingError>;
}

/// Runs `matugen image <path> --json hex --dry-run`.
#[derive(Debug, Clone)]
pub struct MatugenExtractor {
    binary: String,
    time_limit: Duration,
}

impl MatugenExtractor {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into(), time_limit: Self::DEFAULT_TIME_LIMIT }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

#[async_trait]
impl ColorExtractor for MatugenExtractor {
    async fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    async fn extract(&self, image: &Path) -> Result<ExtractorOutput, ThemingError> {
        debug!("Running {} on {:?}", self.binary, image);
        let mut command = Command::new(&self.binary);
        command.arg("image").arg(image).args(["--json", "hex", "--dry-run"]).kill_on_drop(true);

        let output = timeout(self.time_limit, command.output())
            .await
            .map_err(|_| ThemingError::ExtractorTimeout(self.time_limit))?
            .map_err(|source| ThemingError::ExtractorSpawn { binary: self.binary.clone(), source })?;

        if !output.status.success() {
            return Err(ThemingError::ExtractorFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8(output.stdout)?;
        ExtractorOutput::from_json(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_unavailable_and_fails_to_spawn() {
        let extractor = MatugenExtractor::new("halo-definitely-missing-extractor");
        assert!(!extractor.is_available().await);
        let err = extractor.extract(Path::new("/tmp/wall.png")).await.unwrap_err();
        assert!(matches!(err, ThemingError::ExtractorSpawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_reported() {
        // `false` ignores its arguments and exits with status 1.
        let extractor = MatugenExtractor::new("false");
        let err = extractor.extract(Path::new("/tmp/wall.png")).await.unwrap_err();
        assert!(matches!(err, ThemingError::ExtractorFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_json_stdout_is_reported() {
        // `echo` prints its arguments, which is not JSON.
        let extractor = MatugenExtractor::new("echo");
        assert!(extractor.is_available().await);
        let err = extractor.extract(Path::new("/tmp/wall.png")).await.unwrap_err();
        assert!(matches!(err, ThemingError::InvalidOutput(_)));
    }
}
