//! Delayed promotion after a dismissal.
//!
//! When the active alert is dismissed the next one is not shown straight
//! away: the renderer gets `dismiss_delay` to play its exit animation.
//! The delay runs as a Tokio task whose handle is kept here, so it can be
//! cancelled on teardown and there is never more than one outstanding.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Post-dismiss pause before the next alert is promoted.
pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct DispatchScheduler {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DispatchScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `promote` once the delay has elapsed.
    ///
    /// Any timer still outstanding is aborted first. Outside a Tokio
    /// runtime there is nothing to wait on, so `promote` runs right away.
    pub fn schedule<F>(&self, promote: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("no Tokio runtime; promoting without the dismiss delay");
                promote();
                return;
            }
        };

        let deadline = Instant::now() + self.delay;
        let task = runtime.spawn(async move {
            time::sleep_until(deadline).await;
            promote();
        });

        let previous = self.lock().replace(task);
        if let Some(previous) = previous {
            if !previous.is_finished() {
                tracing::debug!("replacing outstanding promotion timer");
                previous.abort();
            }
        }
    }

    /// Abort the outstanding timer. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a delayed promotion has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DispatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_DELAY)
    }
}

impl Drop for DispatchScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.lock().take() {
            task.abort();
        }
    }
}
