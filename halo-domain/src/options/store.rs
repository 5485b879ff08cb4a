//! Persistent options document.
//!
//! The document is a flat JSON object keyed by option id and holds only user
//! overrides; compiled-in defaults are never written. Reads never fail: a
//! missing, unreadable or corrupt document is treated as `{}`. Writes are
//! best-effort and serialised within the process so overlapping
//! read-modify-write cycles cannot lose updates.
//!
//! Setting a cell does not touch the disk. Callers persist explicitly with
//! [`OptionsStore::commit`].

use std::path::{Path, PathBuf};

use halo_core::utils::fs;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::errors::OptionsError;
use super::tree::OptionsTree;

pub type OptionsDocument = Map<String, Value>;

#[derive(Debug)]
pub struct OptionsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl OptionsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document, creating an empty one (and its parents) if missing.
    pub async fn read(&self) -> OptionsDocument {
        match self.try_read().await {
            Ok(document) => document,
            Err(e) => {
                warn!("Options document {:?} unusable, treating as empty: {}", self.path, e);
                Map::new()
            }
        }
    }

    async fn try_read(&self) -> Result<OptionsDocument, OptionsError> {
        fs::ensure_file_exists(&self.path, "{}").await?;
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(document) => Ok(document),
            _ => Err(OptionsError::NotAnObject),
        }
    }

    async fn write(&self, document: &OptionsDocument) -> Result<(), OptionsError> {
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        fs::write_string_atomic(&self.path, &text).await?;
        Ok(())
    }

    /// Read-modify-write of the document. Failures are logged and swallowed.
    pub async fn modify<F>(&self, updater: F)
    where
        F: FnOnce(&mut OptionsDocument),
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read().await;
        updater(&mut document);
        if let Err(e) = self.write(&document).await {
            warn!("Failed to write options document {:?}: {}", self.path, e);
        }
    }

    /// Persists the tree's overrides. Ids back at their default are removed
    /// from the document; ids unknown to the tree are left alone.
    pub async fn commit(&self, tree: &OptionsTree) {
        let snapshot: Vec<(String, Value, bool)> = tree
            .leaves()
            .into_iter()
            .map(|cell| (cell.id().to_string(), cell.get(), cell.is_default()))
            .collect();
        self.modify(move |document| {
            for (id, value, is_default) in snapshot {
                if is_default {
                    document.remove(&id);
                } else {
                    document.insert(id, value);
                }
            }
        })
        .await;
        debug!("Committed options to {:?}", self.path);
    }

    /// Applies the persisted overrides onto `tree`. Returns the ids that changed.
    pub async fn load_into(&self, tree: &OptionsTree) -> Vec<String> {
        let document = self.read().await;
        let changed = tree.apply_flat(&document);
        debug!("Loaded {} option override(s) from {:?}", changed.len(), self.path);
        changed
    }
}
