//! Subscriber registry for active-slot changes.
//!
//! Listeners are called synchronously in registration order. A listener
//! that panics is logged and skipped; the rest still get the update.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::alerts::types::AlertRequest;

/// Callback receiving the new active request, or `None` when hidden.
pub type Listener = Arc<dyn Fn(Option<&AlertRequest>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListenerId(u64);

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.lock().iter().any(|(existing, _)| *existing == id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Deliver `current` to every listener registered at call time.
    ///
    /// Returns how many listeners panicked.
    pub fn notify(&self, current: Option<&AlertRequest>) -> usize {
        // Snapshot so listeners can (un)subscribe without deadlocking.
        let snapshot: Vec<Listener> = self.lock().iter().map(|(_, l)| l.clone()).collect();

        let mut panicked = 0;
        for listener in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(current))).is_err() {
                panicked += 1;
                tracing::error!(
                    alert = ?current.map(AlertRequest::id),
                    "alert listener panicked; continuing with remaining listeners"
                );
            }
        }
        panicked
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping it does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    id: ListenerId,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Remove this listener. Calling it again does nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id.0).finish()
    }
}
