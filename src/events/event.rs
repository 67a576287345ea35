//! # Notification envelope.
//!
//! An [`Event`] wraps any `Send + Sync` payload posted to views. Payload types are
//! plain application structs; delivery picks handlers by the payload's concrete type.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) assigned when it is
//! wrapped. Sequence numbers reflect wrap order, which is post order per thread.
//!
//! ## Example
//! ```rust
//! use viewvisor::Event;
//!
//! struct ButtonUpdated { text: String }
//!
//! let ev = Event::new(ButtonUpdated { text: "OK".into() });
//! assert_eq!(ev.payload::<ButtonUpdated>().map(|b| b.text.as_str()), Some("OK"));
//! assert!(ev.payload::<u32>().is_none());
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Type-erased notification with ordering metadata.
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    kind: TypeId,
    kind_name: &'static str,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Event {
    /// Wraps `payload` with the next sequence number.
    pub fn new<E: Any + Send + Sync>(payload: E) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind: TypeId::of::<E>(),
            kind_name: std::any::type_name::<E>(),
            payload: Arc::new(payload),
        }
    }

    /// `TypeId` of the payload.
    #[inline]
    pub fn kind(&self) -> TypeId {
        self.kind
    }

    /// Type name of the payload (diagnostics only).
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    /// The payload as `E`, if that is its type.
    #[inline]
    pub fn payload<E: Any>(&self) -> Option<&E> {
        self.payload.downcast_ref::<E>()
    }

    #[inline]
    pub(crate) fn raw_payload(&self) -> &(dyn Any + Send + Sync) {
        self.payload.as_ref()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("seq", &self.seq)
            .field("kind", &self.kind_name)
            .finish()
    }
}
