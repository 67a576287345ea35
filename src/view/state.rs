//! Saved state and screen collaborators.
//!
//! [`SavedState`] is the opaque integer bundle the host persists across process
//! death. The orchestrator writes exactly one entry, [`LAST_ORIENTATION_KEY`].
//! [`Screen`] reports the orientation of the display right now.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use super::reason::Orientation;

/// Key under which the last observed orientation is persisted.
pub const LAST_ORIENTATION_KEY: &str = "viewvisor.last_orientation";

/// Integer key-value bundle handed over by the host on save and restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    entries: BTreeMap<String, i64>,
}

impl SavedState {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put_int(&mut self, key: impl Into<String>, value: i64) {
        self.entries.insert(key.into(), value);
    }

    /// Value under `key`, if present.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.entries.get(key).copied()
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Orientation recorded by a previous save, if any.
    pub fn last_orientation(&self) -> Option<Orientation> {
        self.get_int(LAST_ORIENTATION_KEY).map(Orientation::from_raw)
    }
}

/// Source of the current display orientation.
pub trait Screen: Send + Sync {
    /// Orientation right now.
    fn orientation(&self) -> Orientation;
}

/// Shareable [`Screen`] whose orientation the host updates on configuration changes.
#[derive(Debug, Clone)]
pub struct ScreenState {
    raw: Arc<AtomicI64>,
}

impl ScreenState {
    /// Screen starting in `orientation`.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            raw: Arc::new(AtomicI64::new(orientation.as_raw())),
        }
    }

    /// Records a new orientation; every clone observes it.
    pub fn set(&self, orientation: Orientation) {
        self.raw.store(orientation.as_raw(), AtomicOrdering::Release);
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(Orientation::Portrait)
    }
}

impl Screen for ScreenState {
    fn orientation(&self) -> Orientation {
        Orientation::from_raw(self.raw.load(AtomicOrdering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_state_orientation_entry() {
        let mut saved = SavedState::new();
        assert!(saved.is_empty());
        assert_eq!(saved.last_orientation(), None);

        saved.put_int(LAST_ORIENTATION_KEY, Orientation::Landscape.as_raw());
        assert_eq!(saved.last_orientation(), Some(Orientation::Landscape));
        assert_eq!(saved.get_int(LAST_ORIENTATION_KEY), Some(2));
    }

    #[test]
    fn test_screen_state_clones_share_orientation() {
        let screen = ScreenState::default();
        let host = screen.clone();
        assert_eq!(screen.orientation(), Orientation::Portrait);
        host.set(Orientation::Landscape);
        assert_eq!(screen.orientation(), Orientation::Landscape);
    }
}
