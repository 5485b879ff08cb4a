//! Asynchronous Utilities for Halo Shell Core.
//!
//! Thin wrappers over the `tokio` runtime plus [`CancelableTimer`], the single
//! primitive behind every debounce, auto-hide and stagger delay in the shell.
//!
//! # Key Items
//!
//! - [`spawn_task`]: wrapper around `tokio::spawn`.
//! - [`timeout`]: runs a future with a deadline.
//! - [`sleep`]: asynchronous pause.
//! - [`CancelableTimer`]: a one-shot delayed callback. Re-arming cancels the
//!   previous shot first, so at most one shot per timer is ever pending.
//!
//! # Examples
//!
//! ```rust,ignore
//! use halo_core::utils::async_utils::CancelableTimer;
//! use std::time::Duration;
//!
//! let mut debounce = CancelableTimer::new();
//! for _ in 0..5 {
//!     debounce.arm(Duration::from_millis(300), || println!("fired once"));
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::warn;

/// Spawns a new asynchronous task on the Tokio runtime.
///
/// ```
/// use halo_core::utils::async_utils::spawn_task;
///
/// #[tokio::main]
/// async fn main() {
///     let handle = spawn_task(async { "done".to_string() });
///     assert_eq!(handle.await.unwrap(), "done");
/// }
/// ```
pub fn spawn_task<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(future)
}

/// Executes a future with a specified timeout.
///
/// Returns `Err(tokio::time::error::Elapsed)` if `duration` passes first.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, time::error::Elapsed>
where
    F: Future<Output = T>,
{
    time::timeout(duration, future).await
}

/// Asynchronously pauses execution for `duration`.
pub async fn sleep(duration: Duration) {
    time::sleep(duration).await
}

/// A cancelable one-shot timer.
///
/// The callback passed to [`CancelableTimer::arm`] runs synchronously right
/// after the delay elapses. Because nothing awaits between the end of the
/// sleep and the callback, a shot that has started its callback always runs
/// it to completion; [`CancelableTimer::cancel`] only prevents shots that are
/// still sleeping.
///
/// Dropping the timer cancels any pending shot.
#[derive(Debug, Default)]
pub struct CancelableTimer {
    handle: Option<JoinHandle<()>>,
}

impl CancelableTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Cancels any pending shot, then schedules `callback` after `delay`.
    ///
    /// Returns `false` (and schedules nothing) when called outside a Tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Timer not armed, no Tokio runtime available: {}", e);
                return false;
            }
        };
        self.handle = Some(runtime.spawn(async move {
            sleep(delay).await;
            callback();
        }));
        true
    }

    /// Cancels the pending shot. Returns `true` if a shot was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Whether a shot is scheduled and has not completed yet.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for CancelableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
