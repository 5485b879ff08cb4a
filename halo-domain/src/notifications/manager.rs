//! Notification lifecycle manager.
//!
//! Keeps the active notifications most-recent-first, capped in size, and
//! drives each one through `Hidden → Visible → Hiding → removed`:
//!
//! - A new popup becomes Visible on mount unless do-not-disturb is on at that
//!   moment, and arms its auto-hide timer. History entries never auto-hide.
//! - Hovering cancels the auto-hide timer; leaving re-arms it with the full
//!   duration.
//! - Timeout, dismiss, action invocation and dismiss-all move an entry to
//!   Hiding and remember the terminal action. Once the hide transition
//!   completes the action is sent to the daemon (expiry sends nothing) and the
//!   entry is removed. An entry evicted over the cap while Hiding still has
//!   its action sent.
//!
//! Every timer is a [`CancelableTimer`]; re-arming always cancels first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use halo_core::config::NotificationsConfig;
use halo_core::utils::async_utils::CancelableTimer;
use rand::Rng;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::daemon::NotificationDaemon;
use super::events::NotificationEvent;
use super::types::{DisplayContext, NotificationEntry, NotificationPhase, NotificationRecord, TerminalAction};
use crate::options::{HandlerSubscription, OptionPath, OptionsTree};

pub const BLACKLIST_OPTION: &str = "notifications.blacklist";
pub const DND_OPTION: &str = "notifications.dnd";

const EVENT_CHANNEL_CAPACITY: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSettings {
    pub max_entries: usize,
    pub popup_timeout: Duration,
    pub transition: Duration,
    pub dismiss_stagger: Duration,
    pub dismiss_jitter: Duration,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::from(&NotificationsConfig::default())
    }
}

impl From<&NotificationsConfig> for ManagerSettings {
    fn from(config: &NotificationsConfig) -> Self {
        Self {
            max_entries: config.max_entries.max(1),
            popup_timeout: Duration::from_millis(config.popup_timeout_ms),
            transition: Duration::from_millis(config.transition_ms),
            dismiss_stagger: Duration::from_millis(config.dismiss_stagger_ms),
            dismiss_jitter: Duration::from_millis(config.dismiss_jitter_ms),
        }
    }
}

struct Slot {
    serial: u64,
    record: NotificationRecord,
    phase: NotificationPhase,
    context: DisplayContext,
    hovered: bool,
    pending: Option<TerminalAction>,
    hide_timer: CancelableTimer,
    stagger_timer: CancelableTimer,
    transition_timer: CancelableTimer,
}

impl Slot {
    fn new(serial: u64, record: NotificationRecord) -> Self {
        Self {
            serial,
            record,
            phase: NotificationPhase::Hidden,
            context: DisplayContext::Popup,
            hovered: false,
            pending: None,
            hide_timer: CancelableTimer::new(),
            stagger_timer: CancelableTimer::new(),
            transition_timer: CancelableTimer::new(),
        }
    }

    fn entry(&self) -> NotificationEntry {
        NotificationEntry {
            record: self.record.clone(),
            phase: self.phase,
            context: self.context,
            hovered: self.hovered,
            pending_action: self.pending.clone(),
        }
    }
}

#[derive(Default)]
struct ManagerState {
    entries: Vec<Slot>,
    blacklist: Vec<String>,
    dnd: bool,
    next_serial: u64,
}

impl ManagerState {
    fn slot_mut(&mut self, id: u32) -> Option<&mut Slot> {
        self.entries.iter_mut().find(|slot| slot.record.id == id)
    }

    fn slot_with_serial(&mut self, id: u32, serial: u64) -> Option<&mut Slot> {
        self.entries.iter_mut().find(|slot| slot.record.id == id && slot.serial == serial)
    }

    fn is_blacklisted(&self, record: &NotificationRecord) -> bool {
        self.blacklist.iter().any(|blocked| {
            *blocked == record.app_name || record.desktop_entry.as_deref() == Some(blocked.as_str())
        })
    }
}

struct ManagerInner {
    daemon: Arc<dyn NotificationDaemon>,
    settings: ManagerSettings,
    state: Mutex<ManagerState>,
    events: broadcast::Sender<NotificationEvent>,
}

/// Owns the active notifications. Cloning shares the manager.
#[derive(Clone)]
pub struct NotificationManager {
    inner: Arc<ManagerInner>,
}

impl NotificationManager {
    pub fn new(daemon: Arc<dyn NotificationDaemon>, settings: ManagerSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(ManagerInner { daemon, settings, state: Mutex::new(ManagerState::default()), events }),
        }
    }

    pub fn subscribe_to_events(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }

    /// Daemon "notified" signal. Returns `false` if the record was blacklisted.
    pub fn notified(&self, record: NotificationRecord, replaced: bool) -> bool {
        self.inner.notified(record, replaced)
    }

    /// Daemon "resolved" signal: the entry is removed without a terminal action.
    pub fn resolved(&self, id: u32) -> bool {
        let mut state = self.inner.lock();
        let Some(index) = state.entries.iter().position(|slot| slot.record.id == id) else {
            return false;
        };
        state.entries.remove(index);
        self.inner.emit(NotificationEvent::Removed { id, action: None });
        true
    }

    /// Shows an entry in `context`. New popups are mounted by [`Self::notified`].
    pub fn mount(&self, id: u32, context: DisplayContext) -> bool {
        let mut state = self.inner.lock();
        let dnd = state.dnd;
        match state.slot_mut(id) {
            Some(slot) => {
                self.inner.mount_slot(slot, context, dnd);
                true
            }
            None => false,
        }
    }

    pub fn hover_enter(&self, id: u32) {
        if let Some(slot) = self.inner.lock().slot_mut(id) {
            slot.hovered = true;
            slot.hide_timer.cancel();
        }
    }

    pub fn hover_leave(&self, id: u32) {
        let mut state = self.inner.lock();
        if let Some(slot) = state.slot_mut(id) {
            slot.hovered = false;
            if slot.phase == NotificationPhase::Visible && slot.context == DisplayContext::Popup {
                self.inner.arm_hide_timer(slot);
            }
        }
    }

    pub fn dismiss(&self, id: u32) -> bool {
        let mut state = self.inner.lock();
        match state.slot_mut(id) {
            Some(slot) => self.inner.begin_hiding(slot, TerminalAction::Dismiss),
            None => false,
        }
    }

    /// Starts hiding `id` and invokes `action_id` once hidden. Unknown actions are ignored.
    pub fn invoke(&self, id: u32, action_id: &str) -> bool {
        let mut state = self.inner.lock();
        let Some(slot) = state.slot_mut(id) else { return false };
        if let Err(e) = slot.record.action(action_id) {
            warn!("{}", e);
            return false;
        }
        self.inner.begin_hiding(slot, TerminalAction::Invoke(action_id.to_string()))
    }

    /// Hides every entry that is not already hiding, cascading by position.
    pub fn dismiss_all(&self) {
        self.inner.dismiss_all();
    }

    /// Completes the hide transition of `id` ahead of the transition timer.
    pub fn transition_complete(&self, id: u32) -> bool {
        self.inner.finish(id, None)
    }

    pub fn set_blacklist(&self, blacklist: Vec<String>) {
        self.inner.lock().blacklist = blacklist;
    }

    pub fn blacklist(&self) -> Vec<String> {
        self.inner.lock().blacklist.clone()
    }

    /// Only affects entries mounted afterwards.
    pub fn set_dnd(&self, dnd: bool) {
        self.inner.lock().dnd = dnd;
    }

    pub fn dnd(&self) -> bool {
        self.inner.lock().dnd
    }

    pub fn entries(&self) -> Vec<NotificationEntry> {
        self.inner.lock().entries.iter().map(Slot::entry).collect()
    }

    pub fn get(&self, id: u32) -> Option<NotificationEntry> {
        self.inner.lock().entries.iter().find(|slot| slot.record.id == id).map(Slot::entry)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the blacklist and do-not-disturb flag in sync with the
    /// `notifications.*` options. Applies the current values immediately.
    pub fn bind_to_options(&self, tree: &OptionsTree) -> HandlerSubscription {
        let blacklist = tree.get_str(BLACKLIST_OPTION).cloned();
        let dnd = tree.get_str(DND_OPTION).cloned();
        let weak = Arc::downgrade(&self.inner);
        let sync = move || {
            let Some(inner) = weak.upgrade() else { return };
            let mut state = inner.lock();
            if let Some(list) = blacklist.as_ref().and_then(|cell| cell.get_as::<Vec<String>>()) {
                state.blacklist = list;
            }
            if let Some(flag) = dnd.as_ref().and_then(|cell| cell.get_as::<bool>()) {
                state.dnd = flag;
            }
        };
        sync();
        tree.handler(&[OptionPath::parse(BLACKLIST_OPTION), OptionPath::parse(DND_OPTION)], sync)
    }
}

impl ManagerInner {
    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: NotificationEvent) {
        let _ = self.events.send(event);
    }

    fn notified(self: &Arc<Self>, record: NotificationRecord, replaced: bool) -> bool {
        let mut state = self.lock();
        let id = record.id;
        if state.is_blacklisted(&record) {
            debug!("Dropping blacklisted notification {} from '{}'", id, record.app_name);
            self.emit(NotificationEvent::Blocked { id, app_name: record.app_name });
            return false;
        }
        if let Some(slot) = state.slot_mut(id) {
            slot.record = record;
            self.emit(NotificationEvent::Updated(id));
            return true;
        }
        if replaced {
            debug!("Replacement for unknown notification {}, adding it", id);
        }

        let serial = state.next_serial;
        state.next_serial += 1;
        state.entries.insert(0, Slot::new(serial, record));
        self.emit(NotificationEvent::Added(id));
        while state.entries.len() > self.settings.max_entries {
            if let Some(mut evicted) = state.entries.pop() {
                let id = evicted.record.id;
                debug!("Evicting notification {} over the cap", id);
                self.emit(NotificationEvent::Evicted(id));
                if let Some(action) = evicted.pending.take() {
                    self.perform(id, action);
                }
            }
        }

        let dnd = state.dnd;
        if let Some(slot) = state.entries.first_mut() {
            self.mount_slot(slot, DisplayContext::Popup, dnd);
        }
        true
    }

    fn mount_slot(self: &Arc<Self>, slot: &mut Slot, context: DisplayContext, dnd: bool) {
        slot.context = context;
        if context == DisplayContext::History {
            slot.hide_timer.cancel();
        }
        if slot.phase != NotificationPhase::Hidden {
            return;
        }
        if dnd && context == DisplayContext::Popup {
            debug!("Do not disturb active, notification {} stays hidden", slot.record.id);
            return;
        }
        slot.phase = NotificationPhase::Visible;
        self.emit(NotificationEvent::PhaseChanged { id: slot.record.id, phase: slot.phase });
        if context == DisplayContext::Popup {
            self.arm_hide_timer(slot);
        }
    }

    fn arm_hide_timer(self: &Arc<Self>, slot: &mut Slot) {
        let (id, serial) = (slot.record.id, slot.serial);
        let weak = Arc::downgrade(self);
        slot.hide_timer.arm(self.settings.popup_timeout, move || {
            let Some(inner) = weak.upgrade() else { return };
            let mut state = inner.lock();
            if let Some(slot) = state.slot_with_serial(id, serial) {
                if slot.phase == NotificationPhase::Visible && !slot.hovered {
                    inner.begin_hiding(slot, TerminalAction::Expire);
                }
            }
        });
    }

    fn begin_hiding(self: &Arc<Self>, slot: &mut Slot, action: TerminalAction) -> bool {
        if slot.phase == NotificationPhase::Hiding {
            return false;
        }
        slot.hide_timer.cancel();
        slot.stagger_timer.cancel();
        slot.phase = NotificationPhase::Hiding;
        slot.pending = Some(action);

        let (id, serial) = (slot.record.id, slot.serial);
        let weak = Arc::downgrade(self);
        slot.transition_timer.arm(self.settings.transition, move || {
            if let Some(inner) = weak.upgrade() {
                inner.finish(id, Some(serial));
            }
        });
        self.emit(NotificationEvent::PhaseChanged { id, phase: NotificationPhase::Hiding });
        true
    }

    fn dismiss_all(self: &Arc<Self>) {
        let mut state = self.lock();
        let jitter_ms = self.settings.dismiss_jitter.as_millis() as u64;
        let mut rng = rand::thread_rng();
        for (index, slot) in state.entries.iter_mut().enumerate() {
            if slot.phase == NotificationPhase::Hiding {
                continue;
            }
            let jitter = if jitter_ms > 0 { rng.gen_range(0..=jitter_ms) } else { 0 };
            let delay = self.settings.dismiss_stagger * index as u32 + Duration::from_millis(jitter);
            let (id, serial) = (slot.record.id, slot.serial);
            let weak = Arc::downgrade(self);
            slot.stagger_timer.arm(delay, move || {
                let Some(inner) = weak.upgrade() else { return };
                let mut state = inner.lock();
                if let Some(slot) = state.slot_with_serial(id, serial) {
                    inner.begin_hiding(slot, TerminalAction::Dismiss);
                }
            });
        }
    }

    /// Removes a Hiding entry and performs its terminal action.
    fn finish(&self, id: u32, serial: Option<u64>) -> bool {
        let action = {
            let mut state = self.lock();
            let Some(index) = state.entries.iter().position(|slot| {
                slot.record.id == id
                    && slot.phase == NotificationPhase::Hiding
                    && serial.map_or(true, |s| s == slot.serial)
            }) else {
                return false;
            };
            let mut slot = state.entries.remove(index);
            slot.pending.take()
        };
        self.emit(NotificationEvent::Removed { id, action: action.clone() });
        if let Some(action) = action {
            self.perform(id, action);
        }
        true
    }

    fn perform(&self, id: u32, action: TerminalAction) {
        if action == TerminalAction::Expire {
            return;
        }
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot reach notification daemon for {}: {}", id, e);
                return;
            }
        };
        let daemon = Arc::clone(&self.daemon);
        runtime.spawn(async move {
            let result = match &action {
                TerminalAction::Dismiss => daemon.dismiss(id).await,
                TerminalAction::Invoke(action_id) => daemon.invoke(id, action_id).await,
                TerminalAction::Expire => Ok(()),
            };
            if let Err(e) = result {
                warn!("Notification daemon request {:?} for {} failed: {}", action, id, e);
            }
        });
    }
}
