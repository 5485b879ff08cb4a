// halo-domain/tests/shell_properties.rs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use halo_domain::notifications::{NotificationPhase, NotificationRecord};
use halo_domain::options::schema::default_tree;
use halo_domain::theming::ExtractorOutput;
use halo_domain::{
    set_handler, ColorExtractor, ManagerSettings, NotificationDaemon, NotificationError, NotificationManager,
    OptionPath, OptionsStore, OptionsTree, PipelineSettings, ThemePipeline, ThemingError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::time::sleep;

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

struct NullDaemon;

#[async_trait]
impl NotificationDaemon for NullDaemon {
    async fn dismiss(&self, _id: u32) -> Result<(), NotificationError> {
        Ok(())
    }

    async fn invoke(&self, _id: u32, _action_id: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}

fn notification_manager() -> NotificationManager {
    NotificationManager::new(Arc::new(NullDaemon), ManagerSettings::default())
}

#[derive(Default)]
struct CountingExtractor {
    calls: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl ColorExtractor for CountingExtractor {
    async fn is_available(&self) -> bool {
        true
    }

    async fn extract(&self, image: &Path) -> Result<ExtractorOutput, ThemingError> {
        self.calls.lock().unwrap().push(image.to_path_buf());
        let palette = r##"{"surface":"#101010","outline":"#202020","on_surface":"#303030","primary":"#404040",
            "on_primary":"#505050","error":"#606060","on_error":"#707070"}"##;
        ExtractorOutput::from_json(&format!(r#"{{"colors":{{"light":{0},"dark":{0}}}}}"#, palette))
    }
}

#[test]
fn leaf_ids_are_dotted_schema_paths() {
    let tree = default_tree();
    assert!(!tree.is_empty());
    for (path, cell) in tree.entries() {
        assert_eq!(cell.id(), path.to_string());
        assert!(tree.cell(&OptionPath::parse(cell.id())).is_some());
    }
}

#[test]
fn set_get_and_reset_round_trip() {
    let tree = default_tree();
    let cell = tree.get_str("bar.position").unwrap().clone();
    let default = cell.default_value();
    let (calls, callback) = counter();
    let _subscription = cell.subscribe(callback);

    cell.set(json!("bottom"));
    cell.set(json!("bottom"));
    assert_eq!(cell.get(), json!("bottom"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cell.set(json!("left"));
    cell.reset();
    assert_eq!(cell.get(), default);
    assert_eq!(cell.default_value(), default);
}

#[test]
fn handler_is_scoped_to_its_dependencies() {
    let tree = default_tree();
    let (calls, callback) = counter();
    let _handler = set_handler(&tree, &[OptionPath::parse("theme")], callback);

    tree.get_str("theme.dark.bg").unwrap().set(json!("#000000"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    tree.get_str("bar.position").unwrap().set(json!("bottom"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn store_survives_missing_and_corrupt_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    let store = OptionsStore::new(&path);
    assert!(store.read().await.is_empty());

    std::fs::write(&path, "{ not json").unwrap();
    assert!(store.read().await.is_empty());

    store.modify(|doc| {
        doc.insert("bar.position".to_string(), json!("bottom"));
    })
    .await;
    assert_eq!(store.read().await.get("bar.position"), Some(&json!("bottom")));
}

#[tokio::test]
async fn committed_overrides_load_into_fresh_tree() {
    let dir = TempDir::new().unwrap();
    let store = OptionsStore::new(dir.path().join("options.json"));
    let tree = default_tree();
    tree.get_str("theme.blur").unwrap().set(json!(20));
    store.commit(&tree).await;

    let fresh = default_tree();
    assert_eq!(store.load_into(&fresh).await, vec!["theme.blur".to_string()]);
    assert_eq!(fresh.get_str("theme.blur").unwrap().get(), json!(20));
}

#[tokio::test(start_paused = true)]
async fn notification_collection_is_capped_at_fifty() {
    let manager = notification_manager();
    for id in 1..=51 {
        manager.notified(NotificationRecord::new(id, "Mail", "hi"), false);
    }
    assert_eq!(manager.len(), 50);
    assert!(manager.get(1).is_none());
    assert!(manager.get(51).is_some());
}

#[tokio::test(start_paused = true)]
async fn replacement_keeps_position() {
    let manager = notification_manager();
    for id in 1..=4 {
        manager.notified(NotificationRecord::new(id, "Chat", "old"), false);
    }
    let before: Vec<u32> = manager.entries().iter().map(|e| e.record.id).collect();
    manager.notified(NotificationRecord::new(3, "Chat", "new"), true);
    let after: Vec<u32> = manager.entries().iter().map(|e| e.record.id).collect();
    assert_eq!(before, after);
    assert_eq!(manager.get(3).unwrap().record.summary, "new");
}

#[tokio::test(start_paused = true)]
async fn blacklisted_app_never_enters_collection() {
    let manager = notification_manager();
    let tree = default_tree();
    let _binding = manager.bind_to_options(&tree);
    manager.notified(NotificationRecord::new(1, "Spotify", "Now playing"), false);
    assert!(manager.is_empty());
}

#[tokio::test(start_paused = true)]
async fn wallpaper_bursts_coalesce_into_one_extraction() {
    let dir = TempDir::new().unwrap();
    let walls: Vec<PathBuf> = (0..5)
        .map(|i| {
            let path = dir.path().join(format!("wall-{}.jpg", i));
            std::fs::write(&path, b"jpeg").unwrap();
            path
        })
        .collect();

    let tree = default_tree();
    tree.get_str("autotheme").unwrap().set(Value::Bool(true));
    let extractor = Arc::new(CountingExtractor::default());
    let pipeline = ThemePipeline::new(&tree, extractor.clone(), PipelineSettings::default()).unwrap();

    for wall in &walls {
        pipeline.wallpaper_changed(wall);
        sleep(Duration::from_millis(60)).await;
    }
    sleep(Duration::from_millis(500)).await;

    assert_eq!(*extractor.calls.lock().unwrap(), vec![walls[4].clone()]);
    assert_eq!(tree.get_str("theme.dark.widget").unwrap().get(), json!("#303030"));
}

#[tokio::test(start_paused = true)]
async fn dismiss_all_clears_within_cascade_window() {
    let settings = ManagerSettings::default();
    let manager = NotificationManager::new(Arc::new(NullDaemon), settings.clone());
    let n = 8u32;
    for id in 1..=n {
        manager.notified(NotificationRecord::new(id, "Build", "done"), false);
    }
    manager.dismiss_all();

    sleep(settings.dismiss_stagger * n).await;
    assert!(manager.entries().iter().all(|e| e.phase == NotificationPhase::Hiding));
    sleep(settings.transition + Duration::from_millis(1)).await;
    assert!(manager.is_empty());
}

#[test]
fn end_to_end_handler_on_single_leaf() {
    let tree = OptionsTree::build(&json!({ "a": { "b": 1, "c": "x" } }));
    assert_eq!(tree.get_str("a.b").unwrap().get(), json!(1));
    assert_eq!(tree.get_str("a.c").unwrap().get(), json!("x"));

    let (calls, callback) = counter();
    let _handler = set_handler(&tree, &[OptionPath::parse("a.b")], callback);
    tree.get_str("a.b").unwrap().set(json!(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    tree.get_str("a.c").unwrap().set(json!("y"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
