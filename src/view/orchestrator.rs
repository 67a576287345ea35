//! # Orchestrator: one view's lifecycle coordinator.
//!
//! The host forwards its native callbacks to an [`Orchestrator`]; the orchestrator
//! holds the view's controller, keeps its subscription in step with its surface, and
//! turns "the surface exists" into a classified readiness callback.
//!
//! ## Native callbacks
//! ```text
//! on_created(saved) ───► restore last orientation, acquire controller
//! on_view_bound(s, saved)
//!    ├─► acquire controller (if not held)
//!    ├─► bind subscription
//!    ├─► deferred? (defer flag set && saved present) ──► park until run_deferred_ready()
//!    └─► readiness:
//!          classify ─► View::on_view_ready
//!                   ─► pop-out hooks       (view, controller)   if popped out
//!                   ─► orientation hooks   (view, controller)   if rotated
//!                   ─► remember orientation
//!                   ─► pending actions     (FIFO, then cleared)
//!                   ─► Controller::on_view_ready
//!                   ─► View::update
//! on_resumed()  ───► return-foreground hooks if coming from Paused, Controller::on_resume
//! on_paused()   ───► Controller::on_pause
//! on_view_unbound() ─► unbind subscription, drop parked readiness, hand surface back
//! on_destroyed()    ─► release controller, unbind
//! ```
//!
//! ## Rules
//! - Every callback is checked against [`Phase::can_transition_to`]; an illegal one
//!   is logged at `warn` and ignored.
//! - The controller is acquired at most once per create/destroy cycle and released
//!   exactly once (on destroy, or on drop if the host never destroyed the view).
//! - A resolution failure aborts the callback with `Err` and leaves the phase unchanged.
//! - Only the delivery thread drives an orchestrator.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::GraphError;
use crate::events::{Binder, EventHandlers};
use crate::graph::{ScopeKey, TypeKey, ViewId};
use crate::observers::{LifecycleEvent, LifecycleKind};
use crate::runtime::Runtime;

use super::capability::{Controller, Ctx, View};
use super::phase::Phase;
use super::reason::{NavigationSignals, Orientation, Readiness, Reason, Signals};
use super::state::{LAST_ORIENTATION_KEY, SavedState};

/// Identity of a registered readiness action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Outcome of [`Orchestrator::on_view_bound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// Readiness ran inline.
    Ready(Reason),
    /// Readiness is parked until [`Orchestrator::run_deferred_ready`].
    Deferred,
    /// The callback was illegal in the current phase; nothing happened.
    Ignored,
}

type PendingAction<V> = Box<dyn FnOnce(&mut V)>;

/// Lifecycle coordinator for a single view instance.
pub struct Orchestrator<V: View> {
    view: V,
    id: ViewId,
    scope: ScopeKey,
    runtime: Arc<Runtime>,

    phase: Phase,
    readiness: Readiness,
    nav: NavigationSignals,
    last_orientation: Orientation,

    controller: Option<Arc<V::Controller>>,
    binder: Binder,
    surface: Option<V::Surface>,
    deferred: Option<SavedState>,

    pending: VecDeque<(ListenerId, PendingAction<V>)>,
    next_listener: u64,
}

impl<V: View> Orchestrator<V> {
    /// Wraps `view`. Its notification handlers are collected now and subscribed
    /// whenever a surface is bound.
    pub fn new(view: V, runtime: Arc<Runtime>) -> Self {
        let id = ViewId::next();
        let scope = view.controller_scope().key(id);

        let mut handlers = EventHandlers::new();
        view.handlers(&mut handlers);
        let binder = Binder::new(runtime.channel().clone(), handlers);

        Self {
            view,
            id,
            scope,
            last_orientation: runtime.screen().orientation(),
            runtime,
            phase: Phase::Initialized,
            readiness: Readiness::new(),
            nav: NavigationSignals::default(),
            controller: None,
            binder,
            surface: None,
            deferred: None,
            pending: VecDeque::new(),
            next_listener: 0,
        }
    }

    /// Native create.
    ///
    /// Restores the last orientation from `saved` (or reads the screen) and acquires
    /// the controller.
    pub fn on_created(&mut self, saved: Option<&SavedState>) -> Result<(), GraphError> {
        if !self.allows(Phase::Created, "on_created") {
            return Ok(());
        }

        self.last_orientation = match saved.and_then(SavedState::last_orientation) {
            Some(orientation) => orientation,
            None => self.runtime.screen().orientation(),
        };
        self.acquire_dependencies()?;

        self.phase = Phase::Created;
        self.emit(LifecycleKind::Created);
        Ok(())
    }

    /// Native surface creation.
    ///
    /// `saved` is present when the host is rebuilding the view from persisted state.
    pub fn on_view_bound(
        &mut self,
        surface: V::Surface,
        saved: Option<&SavedState>,
    ) -> Result<Attach, GraphError> {
        if !self.allows(Phase::ViewBound, "on_view_bound") {
            return Ok(Attach::Ignored);
        }
        self.acquire_dependencies()?;

        self.surface = Some(surface);
        self.binder.bind();
        self.phase = Phase::ViewBound;
        self.emit(LifecycleKind::ViewBound);

        if let Some(saved) = saved.filter(|_| self.nav.defers_attach()) {
            debug!(view = %self.id, "readiness deferred until the container restores state");
            self.deferred = Some(saved.clone());
            self.emit(LifecycleKind::ReadyDeferred);
            return Ok(Attach::Deferred);
        }

        Ok(Attach::Ready(self.ready(saved)))
    }

    /// Runs a parked readiness callback. Returns `None` if nothing was parked.
    pub fn run_deferred_ready(&mut self) -> Option<Reason> {
        let saved = self.deferred.take()?;
        if !self.phase.has_surface() {
            warn!(view = %self.id, phase = %self.phase, "deferred readiness without a surface; dropped");
            return None;
        }
        Some(self.ready(Some(&saved)))
    }

    /// Native resume.
    pub fn on_resumed(&mut self) {
        let previous = self.phase;
        if !self.allows(Phase::Resumed, "on_resumed") {
            return;
        }
        self.phase = Phase::Resumed;
        self.emit(LifecycleKind::Resumed);

        let Some(controller) = self.controller.clone() else {
            return;
        };
        if previous == Phase::Paused {
            let runtime = self.runtime.clone();
            let cx = Ctx::new(&controller, runtime.bus());
            self.view.on_return_foreground(&cx);
            controller.on_return_foreground();
            self.emit(LifecycleKind::ReturnedForeground);
        }
        controller.on_resume();
    }

    /// Native pause.
    pub fn on_paused(&mut self) {
        if !self.allows(Phase::Paused, "on_paused") {
            return;
        }
        self.phase = Phase::Paused;
        if let Some(controller) = &self.controller {
            controller.on_pause();
        }
        self.emit(LifecycleKind::Paused);
    }

    /// Native surface teardown. Hands the surface back to the host.
    ///
    /// The subscription is removed even if the call is otherwise illegal.
    pub fn on_view_unbound(&mut self) -> Option<V::Surface> {
        self.binder.unbind();
        if !self.allows(Phase::ViewUnbound, "on_view_unbound") {
            return None;
        }
        if self.deferred.take().is_some() {
            debug!(view = %self.id, "parked readiness dropped with the surface");
        }
        self.phase = Phase::ViewUnbound;
        self.emit(LifecycleKind::ViewUnbound);
        self.surface.take()
    }

    /// Native destroy. Releases the controller; terminal.
    pub fn on_destroyed(&mut self) {
        if !self.allows(Phase::Destroyed, "on_destroyed") {
            return;
        }
        self.binder.unbind();
        self.release_dependencies();
        self.pending.clear();
        self.phase = Phase::Destroyed;
        self.emit(LifecycleKind::Destroyed);
    }

    /// Persists what a rebuilt instance needs to classify its first readiness.
    pub fn on_save_state(&self, out: &mut SavedState) {
        out.put_int(LAST_ORIENTATION_KEY, self.last_orientation.as_raw());
    }

    /// The view is about to come back from the back stack.
    pub fn mark_about_to_pop_out(&mut self) {
        self.nav.mark_pop_out();
    }

    /// Parks readiness of restored attaches until [`run_deferred_ready`](Self::run_deferred_ready).
    pub fn set_defer_attach(&mut self, defer: bool) {
        self.nav.set_defer_attach(defer);
    }

    /// The view is about to be covered by another one.
    pub fn push_to_back_stack(&mut self) {
        let Some(controller) = self.controller.clone() else {
            warn!(view = %self.id, phase = %self.phase, "push_to_back_stack without a controller; ignored");
            return;
        };
        let runtime = self.runtime.clone();
        let cx = Ctx::new(&controller, runtime.bus());
        self.view.on_pushing_to_back_stack(&cx);
        controller.on_pushing_to_back_stack();
        self.emit(LifecycleKind::PushedToBackStack);
    }

    /// Back button. `true` if the view consumed it.
    pub fn back_pressed(&mut self) -> bool {
        let Some(controller) = self.controller.clone() else {
            return false;
        };
        let runtime = self.runtime.clone();
        let cx = Ctx::new(&controller, runtime.bus());
        self.view.on_back_pressed(&cx)
    }

    /// Queues `action` to run after the next readiness callback.
    ///
    /// Actions run once, in registration order, right after the readiness hooks and
    /// before the controller is told the view is ready.
    pub fn register_on_view_ready(&mut self, action: impl FnOnce(&mut V) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let action: PendingAction<V> = Box::new(action);
        self.pending.push_back((id, action));
        id
    }

    /// Removes a queued action. Returns `false` if it already ran or was never queued.
    pub fn unregister_on_view_ready(&mut self, id: ListenerId) -> bool {
        match self.pending.iter().position(|(pid, _)| *pid == id) {
            Some(pos) => self.pending.remove(pos).is_some(),
            None => false,
        }
    }

    /// Drops every queued action.
    pub fn clear_on_view_ready(&mut self) {
        self.pending.clear();
    }

    /// Posts a notification to every bound view (this one included, if bound).
    pub fn post_event_to_views<E: std::any::Any + Send + Sync>(&self, payload: E) {
        self.runtime.bus().post(payload);
    }

    /// Identity of this view instance.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Orientation observed at the last readiness (or restored on create).
    pub fn last_orientation(&self) -> Orientation {
        self.last_orientation
    }

    /// The wrapped view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The wrapped view, mutably.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The controller, while held.
    pub fn controller(&self) -> Option<&Arc<V::Controller>> {
        self.controller.as_ref()
    }

    /// The bound surface, if any.
    pub fn surface(&self) -> Option<&V::Surface> {
        self.surface.as_ref()
    }

    /// True while the view receives notifications.
    pub fn is_subscribed(&self) -> bool {
        self.binder.is_bound()
    }

    /// Number of queued readiness actions.
    pub fn pending_actions(&self) -> usize {
        self.pending.len()
    }

    fn ready(&mut self, saved: Option<&SavedState>) -> Reason {
        let previous = self.last_orientation;
        let current = self.runtime.screen().orientation();
        let reason = self.readiness.classify(Signals {
            previous,
            current,
            restored: saved.is_some(),
            about_to_pop_out: self.nav.take_pop_out(),
        });
        debug!(view = %self.id, %reason, %previous, %current, "view ready");

        let (Some(controller), Some(surface)) = (self.controller.clone(), self.surface.as_ref())
        else {
            warn!(view = %self.id, "readiness without controller or surface; hooks skipped");
            self.last_orientation = current;
            return reason;
        };
        let runtime = self.runtime.clone();
        let cx = Ctx::new(&controller, runtime.bus());

        self.view.on_view_ready(&cx, surface, saved, reason);

        if reason.is_popped_out() {
            self.view.on_popped_out_to_front(&cx);
            controller.on_popped_out_to_front();
        }
        if reason.is_rotated() {
            self.view.on_orientation_changed(&cx, previous, current);
            controller.on_orientation_changed(previous, current);
        }
        self.last_orientation = current;

        for (id, action) in std::mem::take(&mut self.pending) {
            trace!(view = %self.id, listener = id.0, "running readiness action");
            action(&mut self.view);
        }

        controller.on_view_ready(reason, current);
        self.view.update(&cx);

        if self.phase == Phase::ViewBound {
            self.phase = Phase::Ready;
        }
        self.runtime
            .emit(LifecycleEvent::new(self.id, LifecycleKind::Ready).with_reason(reason));
        reason
    }

    fn acquire_dependencies(&mut self) -> Result<(), GraphError> {
        if self.controller.is_some() {
            trace!(view = %self.id, "controller already held");
            return Ok(());
        }
        let controller = self.runtime.graph().acquire::<V::Controller>(self.scope)?;
        debug!(
            view = %self.id,
            controller = TypeKey::of::<V::Controller>().name(),
            scope = %self.scope,
            "controller acquired"
        );
        self.controller = Some(controller);
        Ok(())
    }

    fn release_dependencies(&mut self) {
        if let Some(controller) = self.controller.take() {
            self.runtime.graph().release(&controller, self.scope);
        }
    }

    fn allows(&self, next: Phase, op: &'static str) -> bool {
        if self.phase.can_transition_to(next) {
            return true;
        }
        warn!(view = %self.id, from = %self.phase, to = %next, op, "illegal lifecycle transition; ignored");
        false
    }

    fn emit(&self, kind: LifecycleKind) {
        self.runtime.emit(LifecycleEvent::new(self.id, kind));
    }
}

impl<V: View> Drop for Orchestrator<V> {
    fn drop(&mut self) {
        if self.controller.is_some() {
            debug!(view = %self.id, phase = %self.phase, "dropped before destroy; releasing controller");
            self.release_dependencies();
        }
    }
}

impl<V: View> std::fmt::Debug for Orchestrator<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("phase", &self.phase)
            .field("last_orientation", &self.last_orientation)
            .field("subscribed", &self.binder.is_bound())
            .field("pending", &self.pending.len())
            .finish()
    }
}
