//! Reactive option cells.
//!
//! An [`Opt<T>`] holds one observable value together with its immutable
//! default and its dotted id. `set` replaces the value and then calls every
//! subscriber synchronously, in subscription order, exactly once. Subscribers
//! receive no payload; they read the cell again.
//!
//! The subscriber list is copied before each dispatch, so callbacks may
//! subscribe, unsubscribe or `set` (this or any other cell) without
//! deadlocking and without disturbing the dispatch in progress.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::errors::OptionsError;

type Callback = Arc<dyn Fn() + Send + Sync>;

struct CellState<T> {
    value: T,
    subscribers: Vec<(u64, Callback)>,
    next_key: u64,
}

struct CellInner<T> {
    id: String,
    default: T,
    state: Mutex<CellState<T>>,
}

impl<T> CellInner<T> {
    fn lock(&self) -> MutexGuard<'_, CellState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

trait SubscriberList: Send + Sync {
    fn remove(&self, key: u64) -> bool;
}

impl<T: Send + Sync> SubscriberList for CellInner<T> {
    fn remove(&self, key: u64) -> bool {
        let mut state = self.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(k, _)| *k != key);
        state.subscribers.len() != before
    }
}

/// A reactive value with an immutable default and id.
///
/// Cloning an `Opt` clones the handle; all clones share one value and one
/// subscriber list.
pub struct Opt<T> {
    inner: Arc<CellInner<T>>,
}

impl<T> Clone for Opt<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Clone + Send + Sync + 'static> Opt<T> {
    pub fn new(id: impl Into<String>, default: T) -> Self {
        Self {
            inner: Arc::new(CellInner {
                id: id.into(),
                state: Mutex::new(CellState { value: default.clone(), subscribers: Vec::new(), next_key: 0 }),
                default,
            }),
        }
    }

    /// Dotted path from the root of the options tree; empty for a root scalar.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    pub fn default_value(&self) -> T {
        self.inner.default.clone()
    }

    /// Replaces the value and notifies every subscriber, even if the value is unchanged.
    pub fn set(&self, value: T) {
        let snapshot: Vec<Callback> = {
            let mut state = self.inner.lock();
            state.value = value;
            state.subscribers.iter().map(|(_, callback)| Arc::clone(callback)).collect()
        };
        for callback in snapshot {
            callback();
        }
    }

    pub fn reset(&self) {
        self.set(self.default_value());
    }

    /// Registers `callback`; it stays attached until [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = {
            let mut state = self.inner.lock();
            let key = state.next_key;
            state.next_key += 1;
            state.subscribers.push((key, Arc::new(callback)));
            key
        };
        let inner: Arc<dyn SubscriberList> = self.inner.clone();
        Subscription { list: Arc::downgrade(&inner), key }
    }

    /// A handle that does not keep the cell alive, for callbacks subscribed
    /// to this same cell.
    pub fn downgrade(&self) -> WeakOpt<T> {
        WeakOpt { inner: Arc::downgrade(&self.inner) }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

/// Non-owning counterpart of [`Opt`].
pub struct WeakOpt<T> {
    inner: Weak<CellInner<T>>,
}

impl<T> WeakOpt<T> {
    pub fn upgrade(&self) -> Option<Opt<T>> {
        self.inner.upgrade().map(|inner| Opt { inner })
    }
}

impl<T> Clone for WeakOpt<T> {
    fn clone(&self) -> Self {
        Self { inner: Weak::clone(&self.inner) }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Opt<T> {
    pub fn is_default(&self) -> bool {
        self.inner.lock().value == self.inner.default
    }
}

impl Opt<Value> {
    /// Deserializes the current value, `None` if it has a different shape.
    pub fn get_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.get()).ok()
    }

    pub fn set_from<T: Serialize>(&self, value: T) -> Result<(), OptionsError> {
        let value = serde_json::to_value(value)?;
        self.set(value);
        Ok(())
    }
}

impl<T: fmt::Debug + Clone + Send + Sync + 'static> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Opt")
            .field("id", &self.inner.id)
            .field("value", &state.value)
            .field("default", &self.inner.default)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

/// Disposer returned by [`Opt::subscribe`].
///
/// Dropping it leaves the callback attached; call [`Subscription::unsubscribe`]
/// to detach. Unsubscribing twice is a no-op.
#[must_use = "dropping a Subscription keeps the callback attached; keep it to unsubscribe later"]
pub struct Subscription {
    list: Weak<dyn SubscriberList>,
    key: u64,
}

impl Subscription {
    /// Detaches the callback. Returns `true` if it was still attached.
    pub fn unsubscribe(&self) -> bool {
        match self.list.upgrade() {
            Some(list) => list.remove(self.key),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}
