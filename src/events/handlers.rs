//! # Per-kind handler table.
//!
//! Views declare which notification kinds they react to by registering one
//! closure per payload type. Delivery looks the payload's `TypeId` up in the
//! table; kinds without a handler are ignored.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use viewvisor::{Event, EventHandlers};
//!
//! struct Refresh;
//! struct Ignored;
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let mut handlers = EventHandlers::new();
//! let h = hits.clone();
//! handlers.on::<Refresh>(move |_| { h.fetch_add(1, Ordering::SeqCst); });
//!
//! assert!(handlers.deliver(&Event::new(Refresh)));
//! assert!(!handlers.deliver(&Event::new(Ignored)));
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::event::Event;

type Handler = Box<dyn Fn(&(dyn Any + Send + Sync)) + Send + Sync>;

/// Handlers keyed by payload type. Several handlers per kind run in registration order.
#[derive(Default)]
pub struct EventHandlers {
    by_kind: HashMap<TypeId, Vec<Handler>>,
}

impl EventHandlers {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for payloads of type `E`.
    pub fn on<E: Any + Send + Sync>(
        &mut self,
        handler: impl Fn(&E) + Send + Sync + 'static,
    ) -> &mut Self {
        let erased: Handler = Box::new(move |payload: &(dyn Any + Send + Sync)| {
            if let Some(ev) = payload.downcast_ref::<E>() {
                handler(ev);
            }
        });
        self.by_kind.entry(TypeId::of::<E>()).or_default().push(erased);
        self
    }

    /// True if at least one handler is registered for `kind`.
    pub fn handles(&self, kind: TypeId) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// True if no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Runs the handlers registered for the event's kind.
    ///
    /// Returns `false` when the kind has no handler.
    pub fn deliver(&self, event: &Event) -> bool {
        match self.by_kind.get(&event.kind()) {
            Some(handlers) => {
                for handler in handlers {
                    handler(event.raw_payload());
                }
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandlers")
            .field("kinds", &self.by_kind.len())
            .finish()
    }
}
