//! # View and Controller capabilities.
//!
//! Application code plugs into the lifecycle by implementing two traits:
//!
//! - [`View`]: the screen-like unit. Owns its widgets (the `Surface`), declares which
//!   notifications it handles, and reacts to readiness and navigation hooks.
//! - [`Controller`]: the business logic bound to the view. Shared through the
//!   ownership graph, so it takes `&self` and manages its own interior state.
//!
//! The orchestrator drives both; neither is ever subclassed.
//!
//! ## Hook order for one readiness callback
//! ```text
//! View::on_view_ready
//!   ├─► View::on_popped_out_to_front ─► Controller::on_popped_out_to_front   (if popped out)
//!   ├─► View::on_orientation_changed ─► Controller::on_orientation_changed   (if rotated)
//!   ├─► pending readiness actions (FIFO)
//!   ├─► Controller::on_view_ready
//!   └─► View::update
//! ```
//!
//! ## Example
//! ```rust
//! use viewvisor::{Controller, Ctx, Reason, SavedState, View};
//!
//! #[derive(Default)]
//! struct CounterController;
//! impl Controller for CounterController {}
//!
//! struct Counter;
//!
//! impl View for Counter {
//!     type Controller = CounterController;
//!     type Surface = String;
//!
//!     fn on_view_ready(
//!         &mut self,
//!         _cx: &Ctx<'_, CounterController>,
//!         surface: &String,
//!         _saved: Option<&SavedState>,
//!         reason: Reason,
//!     ) {
//!         if reason.is_first_time() {
//!             let _ = surface.len();
//!         }
//!     }
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::events::{Bus, EventHandlers};
use crate::graph::{ScopeKey, ViewId};

use super::reason::{Orientation, Reason};
use super::state::SavedState;

/// Where a view's controller instance lives in the ownership graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerScope {
    /// One instance for every view that asks for the type.
    #[default]
    Shared,
    /// A fresh instance for this view, released when it is destroyed.
    PerView,
}

impl ControllerScope {
    /// Graph scope for the view `id`.
    pub fn key(self, id: ViewId) -> ScopeKey {
        match self {
            ControllerScope::Shared => ScopeKey::Shared,
            ControllerScope::PerView => ScopeKey::View(id),
        }
    }
}

/// What a hook can reach: the view's controller and the notification bus.
pub struct Ctx<'a, C> {
    controller: &'a Arc<C>,
    bus: &'a Bus,
}

impl<'a, C> Ctx<'a, C> {
    pub(crate) fn new(controller: &'a Arc<C>, bus: &'a Bus) -> Self {
        Self { controller, bus }
    }

    /// The controller bound to this view.
    pub fn controller(&self) -> &Arc<C> {
        self.controller
    }

    /// Posts a notification to every bound view.
    pub fn post<E: Any + Send + Sync>(&self, payload: E) {
        self.bus.post(payload);
    }

    /// The bus, for handing to work that outlives the hook.
    pub fn bus(&self) -> &Bus {
        self.bus
    }
}

/// Business logic attached to a view.
///
/// Every hook defaults to a no-op. Hooks run on the delivery thread.
#[allow(unused_variables)]
pub trait Controller: Send + Sync + 'static {
    /// The bound view finished its readiness callback.
    fn on_view_ready(&self, reason: Reason, orientation: Orientation) {}

    /// The bound view entered the foreground.
    fn on_resume(&self) {}

    /// The bound view left the foreground.
    fn on_pause(&self) {}

    /// The bound view resumed after a pause without rebuilding its surface.
    fn on_return_foreground(&self) {}

    /// The bound view is about to be covered by another one.
    fn on_pushing_to_back_stack(&self) {}

    /// The bound view came back from the back stack.
    fn on_popped_out_to_front(&self) {}

    /// The display rotated between two readiness callbacks.
    fn on_orientation_changed(&self, previous: Orientation, current: Orientation) {}
}

/// A screen-like unit driven by an [`Orchestrator`](super::Orchestrator).
#[allow(unused_variables)]
pub trait View: 'static {
    /// Controller acquired from the ownership graph.
    type Controller: Controller;

    /// Native widget tree handed over on bind and back on unbind.
    type Surface;

    /// Scope of the controller instance. Defaults to [`ControllerScope::Shared`].
    fn controller_scope(&self) -> ControllerScope {
        ControllerScope::Shared
    }

    /// Declares the notifications this view handles while its surface is bound.
    ///
    /// Called once, when the orchestrator is built. Handlers capture whatever shared
    /// state they need.
    fn handlers(&self, handlers: &mut EventHandlers) {}

    /// The surface is usable; `reason` says why.
    ///
    /// `saved` is present only when the view is being rebuilt from persisted state.
    fn on_view_ready(
        &mut self,
        cx: &Ctx<'_, Self::Controller>,
        surface: &Self::Surface,
        saved: Option<&SavedState>,
        reason: Reason,
    );

    /// Called after [`on_view_ready`](Self::on_view_ready) when the orientation changed.
    fn on_orientation_changed(
        &mut self,
        cx: &Ctx<'_, Self::Controller>,
        previous: Orientation,
        current: Orientation,
    ) {
    }

    /// Called after [`on_view_ready`](Self::on_view_ready) when returning from the back stack.
    fn on_popped_out_to_front(&mut self, cx: &Ctx<'_, Self::Controller>) {}

    /// Resumed after a pause without a new surface (e.g. app brought back to the foreground).
    fn on_return_foreground(&mut self, cx: &Ctx<'_, Self::Controller>) {}

    /// About to be covered by another view and pushed to the back stack.
    fn on_pushing_to_back_stack(&mut self, cx: &Ctx<'_, Self::Controller>) {}

    /// Back button. Return `true` to consume it; `false` lets the host dismiss the view.
    fn on_back_pressed(&mut self, cx: &Ctx<'_, Self::Controller>) -> bool {
        false
    }

    /// Refreshes the surface from the controller. Runs last in every readiness callback.
    fn update(&mut self, cx: &Ctx<'_, Self::Controller>) {}
}
