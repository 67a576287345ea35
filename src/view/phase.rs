//! # View lifecycle phase.
//!
//! One enum and one transition table replace the scattered "already injected" /
//! "coming back from background" flags.
//!
//! ```text
//! Initialized ─► Created ─► ViewBound ─► Ready ─► Resumed ⇄ Paused
//!                   │           │  │                 ▲         │
//!                   │           │  └─────────────────┘         │
//!                   │           ▼                              ▼
//!                   │      ViewUnbound ◄───────────────────────┘
//!                   │        │    │
//!                   │        │    └──► ViewBound (rebind, e.g. rotation)
//!                   ▼        ▼
//!                 Destroyed ◄┘
//! ```
//!
//! `ViewBound ─► Resumed` covers a host resuming while a deferred readiness
//! callback is still parked. Staying in the same phase is always legal.

use std::fmt;

/// Where a view is in its native lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Constructed, no native callback yet.
    #[default]
    Initialized,
    /// Native create ran; dependencies held.
    Created,
    /// Surface attached and subscribed; readiness not yet delivered.
    ViewBound,
    /// Readiness callback delivered.
    Ready,
    /// In the foreground.
    Resumed,
    /// Left the foreground.
    Paused,
    /// Surface torn down; the instance may bind a new one.
    ViewUnbound,
    /// Terminal.
    Destroyed,
}

impl Phase {
    /// True if moving from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: Phase) -> bool {
        match (self, next) {
            (Phase::Initialized, Phase::Created) => true,
            // surface may never be bound
            (Phase::Created, Phase::ViewBound | Phase::Destroyed) => true,
            (Phase::ViewBound, Phase::Ready | Phase::Resumed | Phase::ViewUnbound) => true,
            (Phase::Ready, Phase::Resumed | Phase::ViewUnbound) => true,
            (Phase::Resumed, Phase::Paused) => true,
            (Phase::Paused, Phase::Resumed | Phase::ViewUnbound) => true,
            (Phase::ViewUnbound, Phase::ViewBound | Phase::Destroyed) => true,
            _ if *self == next => true,
            _ => false,
        }
    }

    /// True while a surface is attached.
    pub fn has_surface(&self) -> bool {
        matches!(
            self,
            Phase::ViewBound | Phase::Ready | Phase::Resumed | Phase::Paused
        )
    }

    /// True once destroyed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Destroyed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Initialized => "initialized",
            Phase::Created => "created",
            Phase::ViewBound => "view_bound",
            Phase::Ready => "ready",
            Phase::Resumed => "resumed",
            Phase::Paused => "paused",
            Phase::ViewUnbound => "view_unbound",
            Phase::Destroyed => "destroyed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_legal() {
        let path = [
            Phase::Initialized,
            Phase::Created,
            Phase::ViewBound,
            Phase::Ready,
            Phase::Resumed,
            Phase::Paused,
            Phase::Resumed,
            Phase::Paused,
            Phase::ViewUnbound,
            Phase::ViewBound,
            Phase::Ready,
            Phase::ViewUnbound,
            Phase::Destroyed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_destroyed_is_terminal() {
        for next in [
            Phase::Initialized,
            Phase::Created,
            Phase::ViewBound,
            Phase::Ready,
            Phase::Resumed,
            Phase::Paused,
            Phase::ViewUnbound,
        ] {
            assert!(!Phase::Destroyed.can_transition_to(next));
        }
        assert!(Phase::Destroyed.is_terminal());
    }

    #[test]
    fn test_illegal_shortcuts() {
        assert!(!Phase::Initialized.can_transition_to(Phase::ViewBound));
        assert!(!Phase::Resumed.can_transition_to(Phase::Destroyed));
        assert!(!Phase::Ready.can_transition_to(Phase::Paused));
        assert!(!Phase::ViewUnbound.can_transition_to(Phase::Resumed));
    }

    #[test]
    fn test_deferred_attach_may_resume_before_ready() {
        assert!(Phase::ViewBound.can_transition_to(Phase::Resumed));
        assert!(Phase::ViewBound.has_surface());
        assert!(!Phase::ViewUnbound.has_surface());
    }
}
