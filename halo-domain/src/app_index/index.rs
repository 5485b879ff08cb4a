//! In-memory cache of installed applications.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use halo_core::config::AppIndexConfig;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use super::entry::{parse_desktop_entry, AppEntry};

const DESKTOP_EXTENSION: &str = "desktop";

struct IndexInner {
    directories: Vec<PathBuf>,
    entries: RwLock<Vec<AppEntry>>,
    reindex_count: AtomicU64,
    reindex_lock: AsyncMutex<()>,
}

/// Application cache over a list of application directories.
///
/// When the same desktop file id exists in several directories the one in
/// the later directory wins, including when it hides the application.
#[derive(Clone)]
pub struct AppIndex {
    inner: Arc<IndexInner>,
}

impl AppIndex {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            inner: Arc::new(IndexInner {
                directories,
                entries: RwLock::new(Vec::new()),
                reindex_count: AtomicU64::new(0),
                reindex_lock: AsyncMutex::new(()),
            }),
        }
    }

    pub fn from_config(config: &AppIndexConfig) -> Self {
        Self::new(config.directories.clone())
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.inner.directories
    }

    /// Rescans every directory and replaces the cache. Returns the number of
    /// indexed applications. Overlapping calls run one after another.
    pub async fn reindex(&self) -> usize {
        let _guard = self.inner.reindex_lock.lock().await;
        let directories = self.inner.directories.clone();
        let entries = match tokio::task::spawn_blocking(move || scan_directories(&directories)).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Application scan task failed: {}", e);
                return self.len();
            }
        };
        let count = entries.len();
        *self.inner.entries.write().unwrap_or_else(PoisonError::into_inner) = entries;
        self.inner.reindex_count.fetch_add(1, Ordering::SeqCst);
        info!("Indexed {} application(s)", count);
        count
    }

    /// Applications whose name, comment or command contains `term`, ignoring
    /// case, sorted by name. An empty term returns everything.
    pub fn query(&self, term: &str) -> Vec<AppEntry> {
        let needle = term.trim().to_lowercase();
        self.read().iter().filter(|entry| needle.is_empty() || entry.matches(&needle)).cloned().collect()
    }

    pub fn all(&self) -> Vec<AppEntry> {
        self.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<AppEntry> {
        self.read().iter().find(|entry| entry.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Completed reindex passes since construction.
    pub fn reindex_count(&self) -> u64 {
        self.inner.reindex_count.load(Ordering::SeqCst)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<AppEntry>> {
        self.inner.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn scan_directories(directories: &[PathBuf]) -> Vec<AppEntry> {
    let mut by_id: BTreeMap<String, AppEntry> = BTreeMap::new();
    for directory in directories {
        if !directory.is_dir() {
            debug!("Skipping missing application directory {:?}", directory);
            continue;
        }
        let mut files = Vec::new();
        collect_desktop_files(directory, &mut files);
        for file in files {
            let Some(id) = desktop_file_id(directory, &file) else { continue };
            let content = match fs::read_to_string(&file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Could not read desktop file {:?}: {}", file, e);
                    continue;
                }
            };
            match parse_desktop_entry(&content, &id, &file) {
                Some(entry) => {
                    by_id.insert(id, entry);
                }
                None => {
                    by_id.remove(&id);
                }
            }
        }
    }
    let mut entries: Vec<AppEntry> = by_id.into_values().collect();
    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
    entries
}

fn collect_desktop_files(directory: &Path, files: &mut Vec<PathBuf>) {
    let read_dir = match fs::read_dir(directory) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            warn!("Could not list application directory {:?}: {}", directory, e);
            return;
        }
    };
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_desktop_files(&path, files);
        } else if path.extension().map_or(false, |ext| ext == DESKTOP_EXTENSION) {
            files.push(path);
        }
    }
}

/// Desktop file id: the path relative to its application directory with
/// separators replaced by `-`.
fn desktop_file_id(directory: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(directory).ok()?;
    let parts: Vec<String> = relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
    Some(parts.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_app(dir: &Path, relative: &str, name: &str, extra: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("[Desktop Entry]\nType=Application\nName={}\nExec={} %F\n{}", name, name.to_lowercase(), extra))
            .unwrap();
    }

    #[tokio::test]
    async fn reindex_scans_nested_directories() {
        let system = TempDir::new().unwrap();
        write_app(system.path(), "firefox.desktop", "Firefox", "Comment=Web browser\n");
        write_app(system.path(), "kde/konsole.desktop", "Konsole", "Comment=Terminal\n");
        fs::write(system.path().join("README"), "not an app").unwrap();

        let index = AppIndex::new(vec![system.path().to_path_buf(), PathBuf::from("/nonexistent/applications")]);
        assert_eq!(index.reindex().await, 2);
        assert_eq!(index.reindex_count(), 1);

        let ids: Vec<String> = index.all().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["firefox.desktop".to_string(), "kde-konsole.desktop".to_string()]);
        assert_eq!(index.get("kde-konsole.desktop").unwrap().exec_command(), "konsole");
    }

    #[tokio::test]
    async fn later_directories_override_earlier_ones() {
        let system = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        write_app(system.path(), "editor.desktop", "Editor", "");
        write_app(system.path(), "ads.desktop", "Ads", "");
        write_app(user.path(), "editor.desktop", "My Editor", "");
        write_app(user.path(), "ads.desktop", "Ads", "Hidden=true\n");

        let index = AppIndex::new(vec![system.path().to_path_buf(), user.path().to_path_buf()]);
        assert_eq!(index.reindex().await, 1);
        assert_eq!(index.get("editor.desktop").unwrap().name, "My Editor");
        assert!(index.get("ads.desktop").is_none());
    }

    #[tokio::test]
    async fn query_filters_case_insensitively() {
        let dir = TempDir::new().unwrap();
        write_app(dir.path(), "a.desktop", "Alacritty", "Comment=GPU terminal\n");
        write_app(dir.path(), "b.desktop", "Blender", "Comment=3D creation\n");
        write_app(dir.path(), "c.desktop", "calculator", "");

        let index = AppIndex::new(vec![dir.path().to_path_buf()]);
        index.reindex().await;

        let names = |term: &str| index.query(term).into_iter().map(|e| e.name).collect::<Vec<_>>();
        assert_eq!(names("TERMINAL"), vec!["Alacritty".to_string()]);
        assert_eq!(names("  "), vec!["Alacritty".to_string(), "Blender".to_string(), "calculator".to_string()]);
        assert!(names("gimp").is_empty());
    }

    #[tokio::test]
    async fn reindex_picks_up_removed_files() {
        let dir = TempDir::new().unwrap();
        write_app(dir.path(), "a.desktop", "Alpha", "");
        let index = AppIndex::new(vec![dir.path().to_path_buf()]);
        assert_eq!(index.reindex().await, 1);
        fs::remove_file(dir.path().join("a.desktop")).unwrap();
        assert_eq!(index.reindex().await, 0);
        assert!(index.is_empty());
    }
}
