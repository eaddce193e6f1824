//! Injectable single-threaded event bus.
//!
//! # Responsibility
//! - Queue sync events in emission order.
//! - Deliver each event to every live subscriber, isolating failures.
//!
//! # Invariants
//! - Delivery never re-enters: events published while delivering are queued
//!   behind the current one.
//! - At most one scroll command per view is pending at any time.
//! - Dropping a `Subscription` unsubscribes it, including mid-delivery.

use crate::sync::events::SyncEvent;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Failure reported by a subscriber callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubscriberError(String);

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type SubscriberResult = Result<(), SubscriberError>;

type Callback = Rc<RefCell<dyn FnMut(&SyncEvent) -> SubscriberResult>>;

struct Subscriber {
    id: u64,
    label: String,
    callback: Callback,
}

#[derive(Default)]
struct BusState {
    queue: VecDeque<SyncEvent>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// Outcome of delivering one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Event channel owned by the coordinator and shared with views.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that can only enqueue events.
    pub fn sender(&self) -> BusSender {
        BusSender {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Registers `callback` for every delivered event.
    pub fn subscribe(
        &self,
        label: impl Into<String>,
        callback: impl FnMut(&SyncEvent) -> SubscriberResult + 'static,
    ) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let label = label.into();
        debug!("event=bus_subscribed module=sync status=ok subscriber={label} id={id}");
        state.subscribers.push(Subscriber {
            id,
            label,
            callback: Rc::new(RefCell::new(callback)),
        });
        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Enqueues `event` behind all pending events.
    pub fn publish(&self, event: SyncEvent) {
        self.state.borrow_mut().queue.push_back(event);
    }

    /// Enqueues `event`, discarding pending events it supersedes.
    pub fn publish_latest(&self, event: SyncEvent) {
        let mut state = self.state.borrow_mut();
        let before = state.queue.len();
        state.queue.retain(|pending| !pending.is_superseded_by(&event));
        let dropped = before - state.queue.len();
        if dropped > 0 {
            debug!(
                "event=bus_superseded module=sync status=ok kind={} dropped={dropped}",
                event.name()
            );
        }
        state.queue.push_back(event);
    }

    /// Dequeues the oldest pending event.
    pub fn next_event(&self) -> Option<SyncEvent> {
        self.state.borrow_mut().queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Drops all pending events.
    pub fn clear_pending(&self) {
        self.state.borrow_mut().queue.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    /// Removes every subscriber.
    pub fn unsubscribe_all(&self) {
        let mut state = self.state.borrow_mut();
        let count = state.subscribers.len();
        state.subscribers.clear();
        debug!("event=bus_unsubscribed_all module=sync status=ok count={count}");
    }

    /// Delivers `event` to every subscriber in subscription order.
    ///
    /// A failing subscriber is logged and skipped; the remaining subscribers
    /// still receive the event. Subscribers removed during delivery are not
    /// called.
    pub fn deliver(&self, event: &SyncEvent) -> DeliveryReport {
        let snapshot: Vec<(u64, String, Callback)> = self
            .state
            .borrow()
            .subscribers
            .iter()
            .map(|subscriber| {
                (
                    subscriber.id,
                    subscriber.label.clone(),
                    Rc::clone(&subscriber.callback),
                )
            })
            .collect();

        let mut report = DeliveryReport::default();
        for (id, label, callback) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                warn!(
                    "event=bus_delivery module=sync status=skipped subscriber={label} kind={} reason=busy",
                    event.name()
                );
                report.failed += 1;
                continue;
            };
            match (&mut *callback)(event) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(
                        "event=bus_delivery module=sync status=error subscriber={label} kind={} error={err}",
                        event.name()
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.state
            .borrow()
            .subscribers
            .iter()
            .any(|subscriber| subscriber.id == id)
    }
}

/// Enqueue-only handle given to views.
///
/// Sending after the bus is gone is a no-op.
#[derive(Clone)]
pub struct BusSender {
    state: Weak<RefCell<BusState>>,
}

impl BusSender {
    /// Enqueues `event`; returns `false` when the bus no longer exists.
    pub fn send(&self, event: SyncEvent) -> bool {
        let Some(state) = self.state.upgrade() else {
            debug!(
                "event=bus_send module=sync status=dropped kind={} reason=bus_gone",
                event.name()
            );
            return false;
        };
        state.borrow_mut().queue.push_back(event);
        true
    }
}

/// Subscription handle; unsubscribes when dropped.
#[must_use = "dropping a subscription unsubscribes it"]
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<BusState>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        if let Ok(mut state) = state.try_borrow_mut() {
            state.subscribers.retain(|subscriber| subscriber.id != self.id);
        };
    }
}
