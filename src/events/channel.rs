//! # EventChannel: synchronous fan-out to subscribed views.
//!
//! [`EventChannel`] keeps the list of active subscriptions (one per bound view)
//! and delivers each published [`Event`] to all of them on the calling thread.
//!
//! ## What it guarantees
//! - `publish(&Event)` delivers before returning, in subscription order.
//! - Events published one after another from one thread are delivered in that order.
//! - A subscription removed during a delivery round receives nothing further,
//!   including the remainder of the current round.
//! - Handlers may publish, subscribe or unsubscribe re-entrantly (no lock is held
//!   while handlers run).
//!
//! ## What it does **not** guarantee
//! - No thread affinity: callers reach the delivery thread through [`Bus`](super::Bus).
//! - No persistence: an event published with no subscribers is gone.
//!
//! ## Diagram
//! ```text
//!    publish(&Event)
//!        │        (snapshot under lock, deliver without lock)
//!        ├────────► sub#1 active? ─► EventHandlers::deliver
//!        ├────────► sub#2 active? ─► EventHandlers::deliver
//!        └────────► sub#N active? ─► EventHandlers::deliver
//! ```

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::event::Event;
use super::handlers::EventHandlers;

/// Identity of one subscription within its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One subscriber: its handlers and a liveness flag checked right before delivery.
struct Slot {
    id: SubscriptionId,
    active: AtomicBool,
    handlers: Arc<EventHandlers>,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    slots: Vec<Arc<Slot>>,
}

/// Cloneable in-process publish/subscribe channel.
#[derive(Clone, Default)]
pub struct EventChannel {
    inner: Arc<Mutex<Subscribers>>,
}

impl EventChannel {
    /// Creates a channel with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription delivering to `handlers`.
    pub fn subscribe(&self, handlers: Arc<EventHandlers>) -> SubscriptionId {
        let mut subs = self.inner.lock();
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.slots.push(Arc::new(Slot {
            id,
            active: AtomicBool::new(true),
            handlers,
        }));
        id
    }

    /// Removes a subscription. Returns `false` if it was not present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.lock();
        match subs.slots.iter().position(|s| s.id == id) {
            Some(pos) => {
                let slot = subs.slots.remove(pos);
                slot.active.store(false, AtomicOrdering::Release);
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to every active subscription on the calling thread.
    ///
    /// Returns how many subscriptions had a handler for the event's kind.
    pub fn publish(&self, event: &Event) -> usize {
        let snapshot: Vec<Arc<Slot>> = self.inner.lock().slots.clone();

        let mut handled = 0;
        for slot in snapshot {
            if !slot.active.load(AtomicOrdering::Acquire) {
                continue;
            }
            if slot.handlers.deliver(event) {
                handled += 1;
            }
        }
        handled
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    /// True if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-owning reference; used by [`Bus`](super::Bus) so producers do not keep the
    /// channel alive.
    pub fn downgrade(&self) -> WeakChannel {
        WeakChannel {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Weak reference to an [`EventChannel`].
#[derive(Clone)]
pub struct WeakChannel {
    inner: Weak<Mutex<Subscribers>>,
}

impl WeakChannel {
    /// The channel, if it still exists.
    pub fn upgrade(&self) -> Option<EventChannel> {
        self.inner.upgrade().map(|inner| EventChannel { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Ping;

    fn counting(hits: &Arc<AtomicUsize>) -> Arc<EventHandlers> {
        let mut handlers = EventHandlers::new();
        let h = hits.clone();
        handlers.on::<Ping>(move |_| {
            h.fetch_add(1, AtomicOrdering::SeqCst);
        });
        Arc::new(handlers)
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let channel = EventChannel::new();
        assert_eq!(channel.publish(&Event::new(Ping)), 0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let channel = EventChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = channel.subscribe(counting(&hits));

        channel.publish(&Event::new(Ping));
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.publish(&Event::new(Ping));

        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_unsubscribe_during_round_skips_rest_of_round() {
        let channel = EventChannel::new();
        let late_hits = Arc::new(AtomicUsize::new(0));

        // first subscriber removes the second one while the round is in progress
        let victim = Arc::new(Mutex::new(None::<SubscriptionId>));
        let mut first = EventHandlers::new();
        {
            let channel = channel.clone();
            let victim = victim.clone();
            first.on::<Ping>(move |_| {
                if let Some(id) = victim.lock().take() {
                    channel.unsubscribe(id);
                }
            });
        }
        channel.subscribe(Arc::new(first));
        let second = channel.subscribe(counting(&late_hits));
        *victim.lock() = Some(second);

        assert_eq!(channel.publish(&Event::new(Ping)), 1);
        assert_eq!(late_hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_reentrant_publish_is_delivered_inline() {
        struct Pong;

        let channel = EventChannel::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut handlers = EventHandlers::new();
        {
            let channel = channel.clone();
            let log = log.clone();
            handlers.on::<Ping>(move |_| {
                log.lock().push("ping");
                channel.publish(&Event::new(Pong));
                log.lock().push("ping-done");
            });
        }
        {
            let log = log.clone();
            handlers.on::<Pong>(move |_| log.lock().push("pong"));
        }
        channel.subscribe(Arc::new(handlers));

        channel.publish(&Event::new(Ping));
        assert_eq!(*log.lock(), vec!["ping", "pong", "ping-done"]);
    }

    #[test]
    fn test_weak_channel_dies_with_last_owner() {
        let channel = EventChannel::new();
        let weak = channel.downgrade();
        assert!(weak.upgrade().is_some());
        drop(channel);
        assert!(weak.upgrade().is_none());
    }
}
