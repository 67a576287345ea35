//! # Readiness classification.
//!
//! Every time a view's surface becomes usable the orchestrator computes a
//! [`Reason`] telling application code *why*: first creation, restoration after
//! process death, rotation, or coming back from the back stack.
//!
//! ## Algorithm (in this order; flags are not exclusive)
//! ```text
//! 1. is_new_instance = marker absent        (then set marker)
//! 2. is_rotated      = current != previous
//! 3. is_restored     = saved state present
//! 4. is_first_time   = !restored && !rotated && !pop_out
//! 5. is_popped_out   = pop_out
//! ```
//! `pop_out` is a single snapshot taken (and cleared) by
//! [`NavigationSignals::take_pop_out`] before the computation; steps 4 and 5 read
//! the same value.

use std::fmt;

/// Screen orientation as seen by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
    /// Unknown or square.
    #[default]
    Unspecified,
}

impl Orientation {
    /// Decodes the integer form used in saved state (`1` portrait, `2` landscape).
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Orientation::Portrait,
            2 => Orientation::Landscape,
            _ => Orientation::Unspecified,
        }
    }

    /// Integer form used in saved state.
    pub fn as_raw(self) -> i64 {
        match self {
            Orientation::Unspecified => 0,
            Orientation::Portrait => 1,
            Orientation::Landscape => 2,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Why a readiness callback fired. Computed once per callback; immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reason {
    new_instance: bool,
    restored: bool,
    rotated: bool,
    first_time: bool,
    popped_out: bool,
}

impl Reason {
    /// First readiness callback of this view instance.
    pub fn is_new_instance(&self) -> bool {
        self.new_instance
    }

    /// The view is being rebuilt from saved state (e.g. after process death).
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Orientation differs from the one last observed.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// None of restored, rotated or popped-out apply.
    pub fn is_first_time(&self) -> bool {
        self.first_time
    }

    /// The view came back to the front from the back stack.
    pub fn is_popped_out(&self) -> bool {
        self.popped_out
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.new_instance, "new_instance"),
            (self.first_time, "first_time"),
            (self.restored, "restored"),
            (self.rotated, "rotated"),
            (self.popped_out, "popped_out"),
        ];
        let set: Vec<&str> = flags.iter().filter(|(on, _)| *on).map(|(_, n)| *n).collect();
        if set.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{}]", set.join(","))
        }
    }
}

/// Raw inputs of one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    /// Orientation observed at the previous readiness (or restored from saved state).
    pub previous: Orientation,
    /// Orientation now.
    pub current: Orientation,
    /// A saved-state bundle accompanies this attach.
    pub restored: bool,
    /// Snapshot of the navigation pop-out flag.
    pub about_to_pop_out: bool,
}

/// Per-view classifier. Its only memory is the new-instance marker.
#[derive(Debug, Default)]
pub struct Readiness {
    seen: bool,
}

impl Readiness {
    /// Fresh classifier for a new view instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the [`Reason`] for one readiness callback.
    pub fn classify(&mut self, signals: Signals) -> Reason {
        let new_instance = !self.seen;
        self.seen = true;

        let rotated = signals.current != signals.previous;
        let restored = signals.restored;
        let popped_out = signals.about_to_pop_out;
        let first_time = !restored && !rotated && !popped_out;

        Reason {
            new_instance,
            restored,
            rotated,
            first_time,
            popped_out,
        }
    }
}

/// Flags raised by the navigation collaborator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigationSignals {
    about_to_pop_out: bool,
    defer_attach: bool,
}

impl NavigationSignals {
    /// Raised right before the view returns from the back stack.
    pub fn mark_pop_out(&mut self) {
        self.about_to_pop_out = true;
    }

    /// Reads and clears the pop-out flag.
    pub fn take_pop_out(&mut self) -> bool {
        std::mem::take(&mut self.about_to_pop_out)
    }

    /// Current pop-out flag without consuming it.
    pub fn pop_out_pending(&self) -> bool {
        self.about_to_pop_out
    }

    /// Whether restored attaches should be parked until the container says so.
    pub fn set_defer_attach(&mut self, defer: bool) {
        self.defer_attach = defer;
    }

    /// See [`set_defer_attach`](Self::set_defer_attach).
    pub fn defers_attach(&self) -> bool {
        self.defer_attach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(previous: Orientation, current: Orientation) -> Signals {
        Signals {
            previous,
            current,
            restored: false,
            about_to_pop_out: false,
        }
    }

    #[test]
    fn test_first_callback_is_new_instance_first_time() {
        let mut r = Readiness::new();
        let reason = r.classify(signals(Orientation::Portrait, Orientation::Portrait));
        assert!(reason.is_new_instance());
        assert!(reason.is_first_time());
        assert!(!reason.is_rotated() && !reason.is_restored() && !reason.is_popped_out());
    }

    #[test]
    fn test_new_instance_only_once() {
        let mut r = Readiness::new();
        r.classify(signals(Orientation::Portrait, Orientation::Portrait));
        for _ in 0..3 {
            let reason = r.classify(signals(Orientation::Portrait, Orientation::Portrait));
            assert!(!reason.is_new_instance());
        }
    }

    #[test]
    fn test_rotation_and_restoration_coexist() {
        let mut r = Readiness::new();
        let reason = r.classify(Signals {
            previous: Orientation::Portrait,
            current: Orientation::Landscape,
            restored: true,
            about_to_pop_out: false,
        });
        assert!(reason.is_rotated());
        assert!(reason.is_restored());
        assert!(!reason.is_first_time());
    }

    #[test]
    fn test_first_time_implies_nothing_else_over_all_inputs() {
        let orientations = [
            Orientation::Portrait,
            Orientation::Landscape,
            Orientation::Unspecified,
        ];
        for previous in orientations {
            for current in orientations {
                for restored in [false, true] {
                    for about_to_pop_out in [false, true] {
                        let reason = Readiness::new().classify(Signals {
                            previous,
                            current,
                            restored,
                            about_to_pop_out,
                        });
                        if reason.is_first_time() {
                            assert!(!reason.is_restored());
                            assert!(!reason.is_rotated());
                            assert!(!reason.is_popped_out());
                        } else {
                            assert!(
                                reason.is_restored() || reason.is_rotated() || reason.is_popped_out()
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_pop_out_signal_is_one_shot() {
        let mut nav = NavigationSignals::default();
        nav.mark_pop_out();
        assert!(nav.pop_out_pending());
        assert!(nav.take_pop_out());
        assert!(!nav.take_pop_out());
    }

    #[test]
    fn test_orientation_raw_encoding() {
        assert_eq!(Orientation::from_raw(2), Orientation::Landscape);
        assert_eq!(Orientation::from_raw(1), Orientation::Portrait);
        assert_eq!(Orientation::from_raw(42), Orientation::Unspecified);
        assert_eq!(Orientation::from_raw(Orientation::Landscape.as_raw()), Orientation::Landscape);
    }

    #[test]
    fn test_reason_display_lists_set_flags() {
        let reason = Readiness::new().classify(signals(Orientation::Portrait, Orientation::Landscape));
        assert_eq!(reason.to_string(), "[new_instance,rotated]");
    }
}
