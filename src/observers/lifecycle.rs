//! # Lifecycle records emitted by orchestrators.
//!
//! Each native callback an orchestrator accepts produces one [`LifecycleEvent`].
//! Records carry a global sequence number so observers watching several views can
//! order them.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::graph::ViewId;
use crate::view::Reason;

static LIFECYCLE_SEQ: AtomicU64 = AtomicU64::new(0);

/// What happened to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// Native create accepted; controller acquired.
    Created,
    /// Surface attached and subscribed.
    ViewBound,
    /// Readiness parked until the container releases it.
    ReadyDeferred,
    /// Readiness callback delivered (`reason` is set).
    Ready,
    /// Entered the foreground.
    Resumed,
    /// Resumed after a pause without a new surface.
    ReturnedForeground,
    /// Left the foreground.
    Paused,
    /// Surface torn down and unsubscribed.
    ViewUnbound,
    /// Controller released; terminal.
    Destroyed,
    /// Covered by another view.
    PushedToBackStack,
}

impl LifecycleKind {
    /// Stable snake_case label.
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleKind::Created => "created",
            LifecycleKind::ViewBound => "view_bound",
            LifecycleKind::ReadyDeferred => "ready_deferred",
            LifecycleKind::Ready => "ready",
            LifecycleKind::Resumed => "resumed",
            LifecycleKind::ReturnedForeground => "returned_foreground",
            LifecycleKind::Paused => "paused",
            LifecycleKind::ViewUnbound => "view_unbound",
            LifecycleKind::Destroyed => "destroyed",
            LifecycleKind::PushedToBackStack => "pushed_to_back_stack",
        }
    }
}

/// One lifecycle record.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// Global, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock time of emission.
    pub at: SystemTime,
    /// The view it concerns.
    pub view: ViewId,
    /// What happened.
    pub kind: LifecycleKind,
    /// Readiness reason, for [`LifecycleKind::Ready`] only.
    pub reason: Option<Reason>,
}

impl LifecycleEvent {
    /// New record stamped with the next sequence number and the current time.
    pub fn new(view: ViewId, kind: LifecycleKind) -> Self {
        Self {
            seq: LIFECYCLE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            view,
            kind,
            reason: None,
        }
    }

    /// Attaches the readiness reason.
    pub fn with_reason(mut self, reason: Reason) -> Self {
        self.reason = Some(reason);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = LifecycleEvent::new(ViewId::from_raw(1), LifecycleKind::Created);
        let b = LifecycleEvent::new(ViewId::from_raw(1), LifecycleKind::ViewBound);
        assert!(b.seq > a.seq);
        assert!(a.reason.is_none());
    }
}
