//! View lifecycle: capabilities, readiness classification, phase and orchestration.
//!
//! ## Contents
//! - [`View`] / [`Controller`] / [`Ctx`] application-facing traits and hook context
//! - [`Readiness`] / [`Reason`] why a surface became usable
//! - [`Phase`] lifecycle state with one transition table
//! - [`SavedState`] / [`Screen`] persisted-state and display collaborators
//! - [`Orchestrator`] per-view coordinator driving all of the above

mod capability;
mod orchestrator;
mod phase;
mod reason;
mod state;

pub use capability::{Controller, ControllerScope, Ctx, View};
pub use orchestrator::{Attach, ListenerId, Orchestrator};
pub use phase::Phase;
pub use reason::{NavigationSignals, Orientation, Readiness, Reason, Signals};
pub use state::{LAST_ORIENTATION_KEY, SavedState, Screen, ScreenState};
