//! # Binder: one view's subscription, tied to its surface.
//!
//! The orchestrator binds when the view's surface is attached and unbinds when it
//! is torn down, so only views between `ViewBound` and `ViewUnbound` receive
//! notifications.
//!
//! ## Rules
//! - `bind()` on an already bound binder is a no-op (no duplicate subscription).
//! - `unbind()` is idempotent and safe before any `bind()`.
//! - Dropping the binder unbinds.

use std::sync::Arc;

use tracing::trace;

use super::channel::{EventChannel, SubscriptionId};
use super::handlers::EventHandlers;

/// Subscription holder for a single view.
pub struct Binder {
    channel: EventChannel,
    handlers: Arc<EventHandlers>,
    subscription: Option<SubscriptionId>,
}

impl Binder {
    /// Creates an unbound binder.
    pub fn new(channel: EventChannel, handlers: EventHandlers) -> Self {
        Self {
            channel,
            handlers: Arc::new(handlers),
            subscription: None,
        }
    }

    /// Subscribes to the channel. Returns `false` if already bound.
    pub fn bind(&mut self) -> bool {
        if self.subscription.is_some() {
            return false;
        }
        let id = self.channel.subscribe(self.handlers.clone());
        trace!(?id, "binder subscribed");
        self.subscription = Some(id);
        true
    }

    /// Unsubscribes. Returns `false` if nothing was bound.
    pub fn unbind(&mut self) -> bool {
        match self.subscription.take() {
            Some(id) => {
                self.channel.unsubscribe(id);
                trace!(?id, "binder unsubscribed");
                true
            }
            None => false,
        }
    }

    /// True while subscribed.
    pub fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Drop for Binder {
    fn drop(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tick;

    fn binder(channel: &EventChannel, hits: &Arc<AtomicUsize>) -> Binder {
        let mut handlers = EventHandlers::new();
        let h = hits.clone();
        handlers.on::<Tick>(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        Binder::new(channel.clone(), handlers)
    }

    #[test]
    fn test_rebind_does_not_duplicate() {
        let channel = EventChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut b = binder(&channel, &hits);

        assert!(b.bind());
        assert!(!b.bind());
        channel.publish(&Event::new(Tick));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_unbind_is_idempotent() {
        let channel = EventChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut b = binder(&channel, &hits);

        assert!(!b.unbind());
        b.bind();
        assert!(b.unbind());
        assert!(!b.unbind());
        channel.publish(&Event::new(Tick));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let channel = EventChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut b = binder(&channel, &hits);
        b.bind();
        drop(b);
        assert!(channel.is_empty());
    }
}
