//! Pending queue plus the single active slot.
//!
//! `AlertQueue` holds requests in strict arrival order (backed by
//! `VecDeque`) and at most one active request. Every mutation is a plain
//! state transition with no side effects; the manager decides what to
//! broadcast based on the return values.

use std::collections::VecDeque;

use crate::alerts::types::{AlertId, AlertRequest};

/// What currently occupies the display slot.
#[derive(Debug, Clone, Default)]
pub enum Slot {
    #[default]
    Idle,
    Active(AlertRequest),
}

/// FIFO queue of requests waiting behind the active slot.
#[derive(Debug, Default)]
pub struct AlertQueue {
    slot: Slot,
    pending: VecDeque<AlertRequest>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request to the tail. No deduplication.
    pub fn enqueue(&mut self, request: AlertRequest) {
        self.pending.push_back(request);
    }

    /// Move the queue head into the slot if the slot is free.
    ///
    /// Returns the newly active request, or `None` when the slot is
    /// already taken or nothing is waiting.
    pub fn promote(&mut self) -> Option<AlertRequest> {
        if let Slot::Active(_) = self.slot {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.slot = Slot::Active(next.clone());
        Some(next)
    }

    /// Clear the slot if `id` is the active request.
    ///
    /// A stale or unknown id leaves everything untouched and returns `None`.
    pub fn dismiss(&mut self, id: AlertId) -> Option<AlertRequest> {
        match &self.slot {
            Slot::Active(current) if current.id() == id => {}
            _ => return None,
        }
        match std::mem::take(&mut self.slot) {
            Slot::Active(dismissed) => Some(dismissed),
            Slot::Idle => None,
        }
    }

    pub fn active(&self) -> Option<&AlertRequest> {
        match &self.slot {
            Slot::Active(request) => Some(request),
            Slot::Idle => None,
        }
    }

    /// Waiting requests, head first.
    pub fn pending(&self) -> impl Iterator<Item = &AlertRequest> {
        self.pending.iter()
    }

    /// Number of requests waiting (excluding the active one).
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Nothing active and nothing waiting.
    pub fn is_idle(&self) -> bool {
        matches!(self.slot, Slot::Idle) && self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::factory::AlertFactory;
    use crate::alerts::types::DismissHandle;
    use proptest::prelude::*;

    fn make(factory: &AlertFactory, title: &str) -> AlertRequest {
        factory.create(title.into(), DismissHandle::detached())
    }

    fn pending_titles(queue: &AlertQueue) -> Vec<String> {
        queue.pending().map(|r| r.title().to_string()).collect()
    }

    // ---- promote ----

    #[test]
    fn new_queue_is_idle() {
        let mut queue = AlertQueue::new();
        assert!(queue.is_idle());
        assert!(queue.active().is_none());
        assert!(queue.promote().is_none());
    }

    #[test]
    fn promote_takes_head_into_slot() {
        let factory = AlertFactory::new();
        let mut queue = AlertQueue::new();
        queue.enqueue(make(&factory, "A"));
        queue.enqueue(make(&factory, "B"));

        let promoted = queue.promote().unwrap();

        assert_eq!(promoted.title(), "A");
        assert_eq!(queue.active().unwrap().title(), "A");
        assert_eq!(pending_titles(&queue), ["B"]);
    }

    #[test]
    fn promote_is_a_no_op_while_slot_is_occupied() {
        let factory = AlertFactory::new();
        let mut queue = AlertQueue::new();
        queue.enqueue(make(&factory, "A"));
        queue.enqueue(make(&factory, "B"));
        queue.promote();

        assert!(queue.promote().is_none());
        assert_eq!(queue.active().unwrap().title(), "A");
        assert_eq!(queue.len(), 1);
    }

    // ---- dismiss ----

    #[test]
    fn dismiss_active_frees_slot_without_promoting() {
        let factory = AlertFactory::new();
        let mut queue = AlertQueue::new();
        queue.enqueue(make(&factory, "A"));
        queue.enqueue(make(&factory, "B"));
        let a = queue.promote().unwrap();

        let dismissed = queue.dismiss(a.id()).unwrap();

        assert_eq!(dismissed.id(), a.id());
        assert!(queue.active().is_none());
        assert_eq!(pending_titles(&queue), ["B"]);
        assert!(!queue.is_idle());
    }

    #[test]
    fn stale_dismiss_leaves_state_unchanged() {
        let factory = AlertFactory::new();
        let mut queue = AlertQueue::new();
        queue.enqueue(make(&factory, "A"));
        queue.enqueue(make(&factory, "B"));
        let a = queue.promote().unwrap();
        queue.dismiss(a.id());
        let b = queue.promote().unwrap();

        assert!(queue.dismiss(a.id()).is_none());
        assert_eq!(queue.active().unwrap().id(), b.id());
    }

    #[test]
    fn dismissing_a_queued_id_is_ignored() {
        let factory = AlertFactory::new();
        let mut queue = AlertQueue::new();
        queue.enqueue(make(&factory, "A"));
        let b = make(&factory, "B");
        let b_id = b.id();
        queue.enqueue(b);
        queue.promote();

        assert!(queue.dismiss(b_id).is_none());
        assert_eq!(queue.active().unwrap().title(), "A");
        assert_eq!(pending_titles(&queue), ["B"]);
    }

    #[test]
    fn duplicates_are_both_kept() {
        let factory = AlertFactory::new();
        let mut queue = AlertQueue::new();
        queue.enqueue(make(&factory, "X"));
        queue.enqueue(make(&factory, "X"));
        assert_eq!(queue.len(), 2);
    }

    // ---- properties ----

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_service_order_matches_arrival_order(titles in prop::collection::vec("[a-z]{1,6}", 1..30)) {
            let factory = AlertFactory::new();
            let mut queue = AlertQueue::new();
            let mut expected = Vec::new();
            for title in &titles {
                let request = make(&factory, title);
                expected.push(request.id());
                queue.enqueue(request);
            }

            let mut served = Vec::new();
            while let Some(active) = queue.promote() {
                served.push(active.id());
                prop_assert!(queue.dismiss(active.id()).is_some());
            }

            prop_assert_eq!(served, expected);
            prop_assert!(queue.is_idle());
        }

        #[test]
        fn prop_never_more_than_one_active(ops in prop::collection::vec(0u8..3, 1..60)) {
            let factory = AlertFactory::new();
            let mut queue = AlertQueue::new();
            let mut shown = std::collections::HashSet::new();

            for op in ops {
                match op {
                    0 => queue.enqueue(make(&factory, "n")),
                    1 => {
                        let before = queue.active().map(|r| r.id());
                        if let Some(promoted) = queue.promote() {
                            prop_assert!(before.is_none());
                            // a dismissed id never becomes active again
                            prop_assert!(shown.insert(promoted.id()));
                        }
                    }
                    _ => {
                        if let Some(id) = queue.active().map(|r| r.id()) {
                            queue.dismiss(id);
                        }
                    }
                }
            }
        }
    }
}
