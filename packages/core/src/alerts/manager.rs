//! Alert manager: the single entry point for showing modal alerts.
//!
//! Composes the factory, queue, listener registry and scheduler so that at
//! most one alert is active while producers anywhere in the app keep
//! calling [`AlertManager::alert`].
//!
//! Notifications go through an outbox: state changes are recorded while
//! the state lock is held, and the outermost caller delivers them after
//! releasing it. A listener or button handler that calls back into the
//! manager only adds to the outbox, so every listener sees transitions in
//! the order they happened and no lock is held while user code runs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;

use crate::alerts::factory::{AlertFactory, NewAlert};
use crate::alerts::listeners::{ListenerRegistry, Subscription};
use crate::alerts::queue::AlertQueue;
use crate::alerts::scheduler::{DispatchScheduler, DEFAULT_DISMISS_DELAY};
use crate::alerts::types::{AlertId, AlertRequest, AlertView, DismissHandle, DismissRoute};
use crate::metrics::AlertMetrics;

/// Tunables for an [`AlertManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Pause between a dismissal and promotion of the next alert.
    pub dismiss_delay: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            dismiss_delay: DEFAULT_DISMISS_DELAY,
        }
    }
}

/// Read-only view of the manager's state.
#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub active: Option<AlertView>,
    pub pending: Vec<AlertView>,
    pub promotion_scheduled: bool,
}

/// Serialises presentation of modal alerts.
///
/// Create one at startup and hand out clones; all clones share the same
/// queue.
#[derive(Clone)]
pub struct AlertManager {
    inner: Arc<Inner>,
}

struct Inner {
    this: Weak<Inner>,
    factory: AlertFactory,
    state: Mutex<DispatchState>,
    listeners: Arc<ListenerRegistry>,
    scheduler: DispatchScheduler,
    metrics: Option<Arc<AlertMetrics>>,
}

#[derive(Default)]
struct DispatchState {
    queue: AlertQueue,
    outbox: VecDeque<Option<AlertRequest>>,
    draining: bool,
}

impl AlertManager {
    pub fn new(config: ManagerConfig) -> Self {
        Self::build(config, None)
    }

    pub fn with_metrics(config: ManagerConfig, metrics: Arc<AlertMetrics>) -> Self {
        Self::build(config, Some(metrics))
    }

    fn build(config: ManagerConfig, metrics: Option<Arc<AlertMetrics>>) -> Self {
        let inner = Arc::new_cyclic(|this| Inner {
            this: this.clone(),
            factory: AlertFactory::new(),
            state: Mutex::new(DispatchState::default()),
            listeners: ListenerRegistry::new(),
            scheduler: DispatchScheduler::new(config.dismiss_delay),
            metrics,
        });
        Self { inner }
    }

    /// Queue an alert. Never blocks and never fails.
    ///
    /// The alert is shown immediately if nothing else is active,
    /// otherwise it waits behind everything queued before it.
    pub fn alert(&self, alert: impl Into<NewAlert>) {
        self.inner.alert(alert.into());
    }

    /// Register a listener for active-slot changes.
    ///
    /// The listener only sees future changes; the current state is not
    /// replayed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&AlertRequest>) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(Arc::new(listener))
    }

    /// Abort a pending post-dismiss promotion. Queued alerts stay queued.
    pub fn cancel_scheduled_promotion(&self) -> bool {
        let cancelled = self.inner.scheduler.cancel();
        if cancelled {
            tracing::debug!("Scheduled promotion cancelled");
        }
        cancelled
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.inner.lock();
        QueueSnapshot {
            active: state.queue.active().map(AlertRequest::snapshot),
            pending: state.queue.pending().map(AlertRequest::snapshot).collect(),
            promotion_scheduled: self.inner.scheduler.is_pending(),
        }
    }

    /// No active alert, nothing queued and no promotion waiting to fire.
    pub fn is_idle(&self) -> bool {
        self.inner.lock().queue.is_idle() && !self.inner.scheduler.is_pending()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn dismiss_delay(&self) -> Duration {
        self.inner.scheduler.delay()
    }

    /// A handle that does not keep the manager alive.
    ///
    /// Button handlers stored inside queued requests should capture this
    /// rather than a clone, or the queue keeps itself alive.
    pub fn downgrade(&self) -> WeakAlertManager {
        WeakAlertManager {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning counterpart of [`AlertManager`].
#[derive(Clone)]
pub struct WeakAlertManager {
    inner: Weak<Inner>,
}

impl WeakAlertManager {
    pub fn upgrade(&self) -> Option<AlertManager> {
        self.inner.upgrade().map(|inner| AlertManager { inner })
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl std::fmt::Debug for AlertManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertManager")
            .field("snapshot", &self.snapshot())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Inner {
    fn alert(&self, alert: NewAlert) {
        let route: Weak<dyn DismissRoute> = self.this.clone();
        let request = self.factory.create(alert, DismissHandle::new(route));
        tracing::debug!("Alert {} requested: {:?}", request.id(), request.title());

        if let Some(metrics) = &self.metrics {
            metrics.requested_total.inc();
        }

        {
            let mut state = self.lock();
            state.queue.enqueue(request);
            self.promote_locked(&mut state);
        }
        self.drain();
    }

    fn promote(&self) {
        {
            let mut state = self.lock();
            self.promote_locked(&mut state);
        }
        self.drain();
    }

    fn promote_locked(&self, state: &mut DispatchState) {
        if let Some(active) = state.queue.promote() {
            tracing::debug!(
                "Alert {} promoted ({} still queued)",
                active.id(),
                state.queue.len()
            );
            if let Some(metrics) = &self.metrics {
                metrics.presented_total.inc();
            }
            state.outbox.push_back(Some(active));
        }
        if let Some(metrics) = &self.metrics {
            metrics.pending.set(state.queue.len() as f64);
        }
    }

    fn dismiss(&self, id: AlertId) {
        {
            let mut state = self.lock();
            if state.queue.dismiss(id).is_none() {
                tracing::debug!("Ignoring dismiss for {}: not the active alert", id);
                if let Some(metrics) = &self.metrics {
                    metrics.stale_dismissals_total.inc();
                }
                return;
            }
            tracing::debug!("Alert {} dismissed", id);
            if let Some(metrics) = &self.metrics {
                metrics.dismissed_total.inc();
            }
            state.outbox.push_back(None);
        }

        let this = self.this.clone();
        self.scheduler.schedule(move || {
            if let Some(inner) = this.upgrade() {
                inner.promote();
            }
        });
        self.drain();
    }

    /// Deliver queued notifications unless an outer call is already doing so.
    fn drain(&self) {
        {
            let mut state = self.lock();
            if state.draining {
                return;
            }
            state.draining = true;
        }

        loop {
            let next = {
                let mut state = self.lock();
                match state.outbox.pop_front() {
                    Some(next) => next,
                    None => {
                        state.draining = false;
                        return;
                    }
                }
            };

            let panicked = self.listeners.notify(next.as_ref());
            if panicked > 0 {
                if let Some(metrics) = &self.metrics {
                    metrics.listener_panics_total.inc_by(panicked as f64);
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DismissRoute for Inner {
    fn dismiss(&self, id: AlertId) {
        Inner::dismiss(self, id);
    }
}
