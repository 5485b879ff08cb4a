//! Theme-from-wallpaper pipeline.
//!
//! Wallpaper and option changes arm a debounce timer; bursts of triggers
//! collapse into one pass. When the timer fires the pass checks its
//! preconditions, runs the extractor on the wallpaper current at that moment
//! and writes the derived colors into the `theme.dark.*` / `theme.light.*`
//! cells one pair at a time.
//!
//! ```text
//! Idle --trigger--> Pending --timer--> Running --ok--> Applying --> Idle
//!                   ^  |                  |
//!                   +--+ re-arm           +--failure/skip--> Idle
//! ```
//!
//! Only one pass is ever in flight. Triggers that arrive while a pass is
//! Running or Applying are dropped; the next trigger after it returns to
//! Idle starts a fresh pass.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use halo_core::config::ThemingConfig;
use halo_core::utils::async_utils::{sleep, spawn_task, CancelableTimer};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::errors::ThemingError;
use super::events::{SkipReason, ThemePipelineEvent};
use super::extractor::ColorExtractor;
use super::palette::{ThemeSlot, ThemeVariants};
use crate::options::{HandlerSubscription, Opt, OptionPath, OptionsTree};

/// Id of the option that enables automatic theming.
pub const AUTOTHEME_OPTION: &str = "autotheme";
/// Id of the option holding the current wallpaper path.
pub const WALLPAPER_OPTION: &str = "wallpaper";

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Pending,
    Running,
    Applying,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub debounce: Duration,
    /// Pause between color pairs; zero yields to the scheduler instead.
    pub apply_stagger: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { debounce: Duration::from_millis(300), apply_stagger: Duration::ZERO }
    }
}

impl From<&ThemingConfig> for PipelineSettings {
    fn from(config: &ThemingConfig) -> Self {
        Self { debounce: config.debounce(), apply_stagger: config.apply_stagger() }
    }
}

/// The dark/light cell pair of every theme slot, in apply order.
#[derive(Debug, Clone)]
pub struct ThemeTargets {
    pairs: Vec<(ThemeSlot, Opt<Value>, Opt<Value>)>,
}

impl ThemeTargets {
    pub fn from_tree(tree: &OptionsTree) -> Result<Self, ThemingError> {
        let lookup = |variant: &str, slot: ThemeSlot| {
            let id = format!("theme.{}.{}", variant, slot.option_suffix());
            tree.get_str(&id).cloned().ok_or(ThemingError::MissingOption(id))
        };
        let pairs = ThemeSlot::APPLY_ORDER
            .iter()
            .map(|&slot| Ok((slot, lookup("dark", slot)?, lookup("light", slot)?)))
            .collect::<Result<Vec<_>, ThemingError>>()?;
        Ok(Self { pairs })
    }
}

struct PipelineState {
    phase: PipelinePhase,
    wallpaper: Option<PathBuf>,
    timer: CancelableTimer,
    generation: u64,
}

struct PipelineInner {
    extractor: Arc<dyn ColorExtractor>,
    enabled: Opt<Value>,
    targets: ThemeTargets,
    settings: PipelineSettings,
    state: Mutex<PipelineState>,
    events: broadcast::Sender<ThemePipelineEvent>,
}

/// Debounced theme generator. Cloning shares the pipeline.
#[derive(Clone)]
pub struct ThemePipeline {
    inner: Arc<PipelineInner>,
}

impl ThemePipeline {
    pub fn new(
        tree: &OptionsTree,
        extractor: Arc<dyn ColorExtractor>,
        settings: PipelineSettings,
    ) -> Result<Self, ThemingError> {
        let enabled = tree
            .get_str(AUTOTHEME_OPTION)
            .cloned()
            .ok_or_else(|| ThemingError::MissingOption(AUTOTHEME_OPTION.to_string()))?;
        let targets = ThemeTargets::from_tree(tree)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            inner: Arc::new(PipelineInner {
                extractor,
                enabled,
                targets,
                settings,
                state: Mutex::new(PipelineState {
                    phase: PipelinePhase::Idle,
                    wallpaper: None,
                    timer: CancelableTimer::new(),
                    generation: 0,
                }),
                events,
            }),
        })
    }

    pub fn phase(&self) -> PipelinePhase {
        self.inner.lock().phase
    }

    pub fn wallpaper(&self) -> Option<PathBuf> {
        self.inner.lock().wallpaper.clone()
    }

    pub fn subscribe_to_events(&self) -> broadcast::Receiver<ThemePipelineEvent> {
        self.inner.events.subscribe()
    }

    /// Records the new wallpaper (an empty path clears it) and triggers a pass.
    pub fn wallpaper_changed(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        self.inner.lock().wallpaper = if path.as_os_str().is_empty() { None } else { Some(path) };
        self.trigger()
    }

    pub fn option_changed(&self) -> bool {
        self.trigger()
    }

    /// Arms (or re-arms) the debounce timer. Returns `false` if the trigger
    /// was dropped because a pass is already running.
    pub fn trigger(&self) -> bool {
        let mut state = self.inner.lock();
        match state.phase {
            PipelinePhase::Running | PipelinePhase::Applying => {
                debug!("Theme pass in progress ({:?}), trigger dropped", state.phase);
                false
            }
            PipelinePhase::Idle | PipelinePhase::Pending => {
                state.generation += 1;
                let generation = state.generation;
                let weak = Arc::downgrade(&self.inner);
                let armed = state.timer.arm(self.inner.settings.debounce, move || {
                    PipelineInner::fire(weak, generation);
                });
                state.phase = if armed { PipelinePhase::Pending } else { PipelinePhase::Idle };
                armed
            }
        }
    }

    /// Cancels a pending pass. Running passes are not interrupted.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.lock();
        if state.phase != PipelinePhase::Pending {
            return false;
        }
        state.timer.cancel();
        state.phase = PipelinePhase::Idle;
        true
    }

    /// Re-triggers the pipeline whenever the `autotheme` option changes.
    pub fn bind_to_options(&self, tree: &OptionsTree) -> HandlerSubscription {
        let weak = Arc::downgrade(&self.inner);
        tree.handler(&[OptionPath::parse(AUTOTHEME_OPTION)], move || {
            if let Some(inner) = weak.upgrade() {
                ThemePipeline { inner }.option_changed();
            }
        })
    }

    /// Feeds the `wallpaper` option into [`Self::wallpaper_changed`], starting
    /// with its current value. `None` if the tree has no such option.
    pub fn bind_wallpaper(&self, tree: &OptionsTree) -> Option<HandlerSubscription> {
        let cell = tree.get_str(WALLPAPER_OPTION)?;
        let current = cell.get_as::<String>().unwrap_or_default();
        if !current.is_empty() {
            self.wallpaper_changed(current);
        }
        let wallpaper = cell.downgrade();
        let weak = Arc::downgrade(&self.inner);
        Some(tree.handler(&[OptionPath::parse(WALLPAPER_OPTION)], move || {
            let (Some(inner), Some(cell)) = (weak.upgrade(), wallpaper.upgrade()) else { return };
            ThemePipeline { inner }.wallpaper_changed(cell.get_as::<String>().unwrap_or_default());
        }))
    }
}

impl PipelineInner {
    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: PipelinePhase) {
        self.lock().phase = phase;
    }

    fn emit(&self, event: ThemePipelineEvent) {
        let _ = self.events.send(event);
    }

    fn fire(weak: Weak<Self>, generation: u64) {
        let Some(inner) = weak.upgrade() else { return };
        {
            let mut state = inner.lock();
            if state.phase != PipelinePhase::Pending || state.generation != generation {
                return;
            }
            state.phase = PipelinePhase::Running;
        }
        spawn_task(async move {
            inner.run_pass().await;
            inner.set_phase(PipelinePhase::Idle);
        });
    }

    async fn check_preconditions(&self) -> Result<PathBuf, SkipReason> {
        if !self.enabled.get_as::<bool>().unwrap_or(false) {
            return Err(SkipReason::Disabled);
        }
        if !self.extractor.is_available().await {
            return Err(SkipReason::ExtractorUnavailable);
        }
        let wallpaper = self.lock().wallpaper.clone().ok_or(SkipReason::NoWallpaper)?;
        if !is_usable_image(&wallpaper) {
            return Err(SkipReason::WallpaperUnusable(wallpaper));
        }
        Ok(wallpaper)
    }

    async fn run_pass(&self) {
        let wallpaper = match self.check_preconditions().await {
            Ok(wallpaper) => wallpaper,
            Err(reason) => {
                info!("Skipping theme generation: {:?}", reason);
                self.emit(ThemePipelineEvent::PassSkipped { reason });
                return;
            }
        };

        let variants = match self.extractor.extract(&wallpaper).await.and_then(|output| output.derive()) {
            Ok(variants) => variants,
            Err(e) => {
                warn!("Theme generation from {:?} failed: {}", wallpaper, e);
                self.emit(ThemePipelineEvent::PassFailed { wallpaper, message: e.to_string() });
                return;
            }
        };

        self.set_phase(PipelinePhase::Applying);
        self.apply(&variants).await;
        info!("Applied theme generated from {:?}", wallpaper);
        self.emit(ThemePipelineEvent::ThemeApplied { wallpaper });
    }

    async fn apply(&self, variants: &ThemeVariants) {
        for (index, (slot, dark, light)) in self.targets.pairs.iter().enumerate() {
            if index > 0 {
                if self.settings.apply_stagger.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    sleep(self.settings.apply_stagger).await;
                }
            }
            dark.set(Value::String(variants.dark.get(*slot).to_string()));
            light.set(Value::String(variants.light.get(*slot).to_string()));
        }
    }
}

fn is_usable_image(path: &Path) -> bool {
    std::fs::metadata(path).map(|meta| meta.is_file() && meta.len() > 0).unwrap_or(false)
}
