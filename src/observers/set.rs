//! # ObserverSet: fan-out over registered observers.
//!
//! ## What it guarantees
//! - `emit(&LifecycleEvent)` reaches every observer before returning, in registration order.
//! - Panics inside observers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No buffering: observers run inline on the emitting thread.
//!
//! ## Diagram
//! ```text
//!    emit(&LifecycleEvent)
//!        ├────► catch_unwind(obs1.on_event)
//!        ├────► catch_unwind(obs2.on_event)
//!        └────► catch_unwind(obsN.on_event)
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::error;

use super::lifecycle::LifecycleEvent;
use super::observer::Observe;

/// Composite fan-out over [`Observe`] implementations.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observe>>,
}

impl ObserverSet {
    /// Creates a set over `observers`.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        Self { observers }
    }

    /// Delivers `event` to every observer.
    pub fn emit(&self, event: &LifecycleEvent) {
        for obs in &self.observers {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| obs.on_event(event))) {
                error!(
                    observer = obs.name(),
                    seq = event.seq,
                    kind = event.kind.as_label(),
                    "observer panicked: {}",
                    panic_message(panic.as_ref())
                );
            }
        }
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.observers.iter().map(|o| o.name()).collect();
        f.debug_struct("ObserverSet").field("observers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ViewId;
    use crate::observers::LifecycleKind;
    use parking_lot::Mutex;

    struct Recorder(Mutex<Vec<LifecycleKind>>);

    impl Observe for Recorder {
        fn on_event(&self, event: &LifecycleEvent) {
            self.0.lock().push(event.kind);
        }
    }

    struct Panicker;

    impl Observe for Panicker {
        fn on_event(&self, _event: &LifecycleEvent) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[test]
    fn test_panicking_observer_does_not_starve_others() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let set = ObserverSet::new(vec![Arc::new(Panicker) as Arc<dyn Observe>, recorder.clone()]);
        assert_eq!(set.len(), 2);

        set.emit(&LifecycleEvent::new(ViewId::from_raw(3), LifecycleKind::Paused));
        set.emit(&LifecycleEvent::new(ViewId::from_raw(3), LifecycleKind::Resumed));

        assert_eq!(
            *recorder.0.lock(),
            vec![LifecycleKind::Paused, LifecycleKind::Resumed]
        );
    }
}
