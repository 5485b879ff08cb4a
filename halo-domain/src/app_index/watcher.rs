//! Filesystem watching for the application directories.
//!
//! Raw `notify` events are forwarded into the runtime and fed to a
//! [`ReindexDebouncer`]: each event re-arms one timer, and only when the
//! directories have been quiet for the debounce delay does a full reindex run.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use halo_core::utils::async_utils::CancelableTimer;
use notify::event::EventKind;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::errors::AppIndexError;
use super::index::AppIndex;

struct DebouncerInner {
    index: AppIndex,
    delay: Duration,
    timer: Mutex<CancelableTimer>,
}

/// Coalesces change notifications into a single reindex.
#[derive(Clone)]
pub struct ReindexDebouncer {
    inner: Arc<DebouncerInner>,
}

impl ReindexDebouncer {
    pub fn new(index: AppIndex, delay: Duration) -> Self {
        Self { inner: Arc::new(DebouncerInner { index, delay, timer: Mutex::new(CancelableTimer::new()) }) }
    }

    /// Restarts the debounce delay.
    pub fn poke(&self) {
        let index = self.inner.index.clone();
        let mut timer = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        timer.arm(self.inner.delay, move || {
            tokio::spawn(async move {
                index.reindex().await;
            });
        });
    }

    pub fn is_pending(&self) -> bool {
        self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner).is_armed()
    }

    pub fn cancel(&self) -> bool {
        self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner).cancel()
    }
}

/// Watches an [`AppIndex`]'s directories and keeps it fresh.
///
/// Directories that do not exist when the watcher starts are skipped.
/// Dropping the watcher stops it.
pub struct AppIndexWatcher {
    _watcher: RecommendedWatcher,
    pump: JoinHandle<()>,
    debouncer: ReindexDebouncer,
    watched: usize,
}

impl AppIndexWatcher {
    pub fn start(index: AppIndex, debounce: Duration) -> Result<Self, AppIndexError> {
        let runtime = Handle::try_current().map_err(|_| AppIndexError::NoRuntime)?;
        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                // The receiver is gone once the watcher is being dropped.
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )?;

        let mut watched = 0;
        for directory in index.directories() {
            if !directory.is_dir() {
                debug!("Not watching missing application directory {:?}", directory);
                continue;
            }
            match watcher.watch(directory, RecursiveMode::Recursive) {
                Ok(()) => {
                    debug!("Watching application directory {:?}", directory);
                    watched += 1;
                }
                Err(e) => warn!("Failed to watch application directory {:?}: {}", directory, e),
            }
        }

        let debouncer = ReindexDebouncer::new(index, debounce);
        let pump_debouncer = debouncer.clone();
        let pump = runtime.spawn(async move {
            while let Some(res) = rx.recv().await {
                match res {
                    Ok(event) if is_relevant(&event.kind) => {
                        debug!("Application directory change: {:?} {:?}", event.kind, event.paths);
                        pump_debouncer.poke();
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Application directory watch error: {}", e),
                }
            }
        });

        info!("App index watcher started on {} director(ies)", watched);
        Ok(Self { _watcher: watcher, pump, debouncer, watched })
    }

    /// Number of directories actually being watched.
    pub fn watched(&self) -> usize {
        self.watched
    }

    pub fn debouncer(&self) -> &ReindexDebouncer {
        &self.debouncer
    }
}

impl Drop for AppIndexWatcher {
    fn drop(&mut self) {
        self.pump.abort();
        self.debouncer.cancel();
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        condition()
    }

    #[tokio::test]
    async fn bursts_of_pokes_trigger_one_reindex() {
        let dir = TempDir::new().unwrap();
        let index = AppIndex::new(vec![dir.path().to_path_buf()]);
        let debouncer = ReindexDebouncer::new(index.clone(), Duration::from_millis(100));

        for _ in 0..5 {
            debouncer.poke();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(debouncer.is_pending());
        assert_eq!(index.reindex_count(), 0);

        assert!(wait_until(Duration::from_secs(5), || index.reindex_count() == 1).await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(index.reindex_count(), 1);
    }

    #[tokio::test]
    async fn watcher_reindexes_after_new_desktop_file() {
        let dir = TempDir::new().unwrap();
        let index = AppIndex::new(vec![dir.path().to_path_buf(), dir.path().join("missing")]);
        let watcher = AppIndexWatcher::start(index.clone(), Duration::from_millis(50)).unwrap();
        assert_eq!(watcher.watched(), 1);

        fs::write(dir.path().join("foot.desktop"), "[Desktop Entry]\nType=Application\nName=Foot\nExec=foot\n").unwrap();
        assert!(wait_until(Duration::from_secs(10), || index.len() == 1).await);
        assert_eq!(index.get("foot.desktop").unwrap().name, "Foot");
    }

    #[test]
    fn start_outside_runtime_fails() {
        let index = AppIndex::new(Vec::new());
        assert!(matches!(AppIndexWatcher::start(index, Duration::from_millis(10)), Err(AppIndexError::NoRuntime)));
    }
}
