//! # Observe: lifecycle hooks for tooling.
//!
//! The [`Observe`] trait is the extension point for watching views come and go:
//! structured logging, debugging overlays, test recorders.
//!
//! ```text
//! Orchestrator ── emit(LifecycleEvent) ──► ObserverSet
//!                                             ├─► LogWriter::on_event
//!                                             ├─► Recorder::on_event
//!                                             └─► CustomObserver::on_event
//! ```
//!
//! ## Rules
//! - Called synchronously on the delivery thread, in registration order.
//! - Must not block; hand heavy work to another thread.
//! - A panicking observer is caught and logged; the others still run.
//!
//! # Example: custom observer
//! ```
//! use viewvisor::{LifecycleEvent, LifecycleKind, Observe};
//!
//! struct ReadyCounter(std::sync::atomic::AtomicUsize);
//!
//! impl Observe for ReadyCounter {
//!     fn on_event(&self, event: &LifecycleEvent) {
//!         if event.kind == LifecycleKind::Ready {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "ready-counter"
//!     }
//! }
//! ```

use super::lifecycle::LifecycleEvent;

/// Receives every [`LifecycleEvent`] emitted by orchestrators sharing a runtime.
pub trait Observe: Send + Sync + 'static {
    /// Called for every emitted record.
    fn on_event(&self, event: &LifecycleEvent);

    /// Name used in logs when the observer panics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
