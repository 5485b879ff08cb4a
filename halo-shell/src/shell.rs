//! Composition root: builds every service once and wires them to the options tree.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use halo_core::config::CoreConfig;
use halo_core::utils::paths::get_default_options_store_path;
use halo_domain::dependencies::{require, DesktopNotifier};
use halo_domain::options::schema::default_tree;
use halo_domain::{
    AppIndex, AppIndexWatcher, ColorExtractor, HandlerSubscription, ManagerSettings, NotificationDaemon,
    NotificationError, NotificationManager, OptionsStore, OptionsTree, PipelineSettings, ThemePipeline,
};
use tracing::{info, warn};

/// Stands in for the notification daemon connection: terminal actions are
/// only logged.
#[derive(Debug, Default)]
pub struct LoggingDaemon;

#[async_trait]
impl NotificationDaemon for LoggingDaemon {
    async fn dismiss(&self, id: u32) -> Result<(), NotificationError> {
        info!("Notification {} dismissed", id);
        Ok(())
    }

    async fn invoke(&self, id: u32, action_id: &str) -> Result<(), NotificationError> {
        info!("Notification {} action '{}' invoked", id, action_id);
        Ok(())
    }
}

pub struct Shell {
    options: OptionsTree,
    store: OptionsStore,
    theme: ThemePipeline,
    notifications: NotificationManager,
    apps: AppIndex,
    watcher: Option<AppIndexWatcher>,
    handlers: Vec<HandlerSubscription>,
}

impl Shell {
    pub async fn build(
        config: &CoreConfig,
        extractor: Arc<dyn ColorExtractor>,
        daemon: Arc<dyn NotificationDaemon>,
        notifier: &dyn DesktopNotifier,
    ) -> Result<Self> {
        let options = default_tree();
        let store_path = match &config.options.store_path {
            Some(path) => path.clone(),
            None => get_default_options_store_path().context("Failed to resolve the options store path")?,
        };
        let store = OptionsStore::new(store_path);
        let loaded = store.load_into(&options).await;
        info!("Options tree ready: {} option(s), {} override(s) from {:?}", options.len(), loaded.len(), store.path());

        require(&[config.theming.extractor_binary.as_str()], notifier).await;

        let theme = ThemePipeline::new(&options, extractor, PipelineSettings::from(&config.theming))
            .context("Failed to set up the theme pipeline")?;
        let mut handlers = vec![theme.bind_to_options(&options)];
        handlers.extend(theme.bind_wallpaper(&options));

        let notifications = NotificationManager::new(daemon, ManagerSettings::from(&config.notifications));
        handlers.push(notifications.bind_to_options(&options));

        let apps = AppIndex::from_config(&config.app_index);
        apps.reindex().await;
        let watcher = match AppIndexWatcher::start(apps.clone(), config.app_index.debounce()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("App index will not follow directory changes: {}", e);
                None
            }
        };

        Ok(Self { options, store, theme, notifications, apps, watcher, handlers })
    }

    pub fn options(&self) -> &OptionsTree {
        &self.options
    }

    pub fn theme(&self) -> &ThemePipeline {
        &self.theme
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn apps(&self) -> &AppIndex {
        &self.apps
    }

    /// Detaches every handler, stops background work and persists the options.
    pub async fn shutdown(self) {
        for handler in &self.handlers {
            handler.unsubscribe();
        }
        self.theme.cancel();
        drop(self.watcher);
        self.store.commit(&self.options).await;
        info!("Options saved to {:?}", self.store.path());
    }
}
