//! # viewvisor
//!
//! **Viewvisor** coordinates the lifecycle of screen-like UI units ("views").
//!
//! It reconciles a view's native create/destroy callbacks with a stable notion of
//! *readiness*, owns the business-logic objects ("controllers") bound to each view
//! through a scoped, reference-counted graph, and delivers notifications to live
//! views on one designated thread no matter which thread produced them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   View #1    │   │   View #2    │   │   View #3    │
//!     │ (user impl)  │   │ (user impl)  │   │ (user impl)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Orchestrator │   │ Orchestrator │   │ Orchestrator │◄── native callbacks
//!     │ Phase,Binder │   │ Phase,Binder │   │ Phase,Binder │    (host UI toolkit)
//!     └┬──────┬──────┘   └┬──────┬──────┘   └┬──────┬──────┘
//!      │      │ subscribe │      │           │      │
//!      │      └───────────┼──────┴───────────┼──────┴──────────┐
//!      │ acquire/release  │                  │                 ▼
//!      ▼                  ▼                  ▼      ┌─────────────────────┐
//! ┌───────────────────────────────────────────────┐ │    EventChannel     │
//! │ Runtime                                       │ │ (sync fan-out to    │
//! │  - GraphClient ─► ObjectGraph (Graph)         │ │  bound views)       │
//! │  - Bus ─► Dispatcher ─────────────────────────┼─►                     │
//! │  - Screen (orientation)                       │ └─────────────────────┘
//! │  - ObserverSet (lifecycle records)            │           ▲
//! └───────────────────────────────────────────────┘           │ delivery thread only
//!                                                              │
//!   any thread ── Bus::post(e) ──► Dispatcher ──► [queue] ─► DeliveryLoop
//! ```
//!
//! ### Lifecycle
//! ```text
//! on_created ─► acquire controller (scope: Shared | PerView)
//! on_view_bound ─► bind subscription ─► classify Reason ─► View::on_view_ready
//!     ├─► popped out?  ─► on_popped_out_to_front (view, controller)
//!     ├─► rotated?     ─► on_orientation_changed (view, controller)
//!     ├─► pending readiness actions (FIFO, once)
//!     ├─► Controller::on_view_ready
//!     └─► View::update
//! on_resumed ⇄ on_paused   (return-foreground once per pause/resume pair)
//! on_view_unbound ─► unbind subscription
//! on_destroyed ─► release controller
//! ```
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------------|-------------------------------------------|
//! | **Views**         | Capability traits implemented by application code.                 | [`View`], [`Controller`], [`Ctx`]         |
//! | **Orchestration** | Per-view lifecycle coordinator with an explicit phase machine.      | [`Orchestrator`], [`Phase`], [`Attach`]   |
//! | **Readiness**     | Why a surface became usable.                                        | [`Reason`], [`Readiness`], [`Orientation`]|
//! | **Ownership**     | Scoped, reference-counted controller instances.                    | [`Graph`], [`ObjectGraph`], [`GraphClient`]|
//! | **Events**        | Lifecycle-scoped notifications delivered on one thread.            | [`Bus`], [`EventChannel`], [`EventHandlers`]|
//! | **Dispatch**      | Thread-affine job execution.                                       | [`Dispatcher`], [`DeliveryLoop`]          |
//! | **Observers**     | Hook into lifecycle records (logging, tooling).                    | [`Observe`], [`LifecycleEvent`]           |
//! | **Errors**        | Typed errors with stable labels.                                   | [`GraphError`], [`DispatchError`]         |
//! | **Configuration** | Centralize runtime settings.                                       | [`Config`], [`Runtime`]                   |
//!
//! ## Optional features
//! - `logging`: exports a tracing-backed [`LogWriter`] observer _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use viewvisor::{
//!     Attach, Config, Controller, Ctx, Dispatcher, Graph, Orchestrator, Reason, Runtime,
//!     SavedState, View,
//! };
//!
//! struct Greeter;
//! impl Controller for Greeter {}
//!
//! struct Hello {
//!     shown: bool,
//! }
//!
//! impl View for Hello {
//!     type Controller = Greeter;
//!     type Surface = ();
//!
//!     fn on_view_ready(&mut self, _: &Ctx<'_, Greeter>, _: &(), _: Option<&SavedState>, reason: Reason) {
//!         self.shown = reason.is_first_time();
//!     }
//! }
//!
//! let (dispatcher, mut delivery) = Dispatcher::attach_current(&Config::default());
//! let graph = Arc::new(Graph::new());
//! graph.register(|_| Ok(Greeter));
//!
//! let runtime = Runtime::builder(Config::default(), Arc::new(dispatcher))
//!     .with_graph(graph)
//!     .build();
//!
//! let mut hello = Orchestrator::new(Hello { shown: false }, runtime);
//! hello.on_created(None)?;
//! assert!(matches!(hello.on_view_bound((), None)?, Attach::Ready(_)));
//! assert!(hello.view().shown);
//!
//! delivery.pump();
//! hello.on_view_unbound();
//! hello.on_destroyed();
//! # Ok::<(), viewvisor::GraphError>(())
//! ```

mod config;
mod error;
mod events;
mod graph;
mod observers;
mod runtime;
mod view;

pub mod dispatch;

// ---- Public re-exports ----

pub use config::Config;
pub use dispatch::{DeliveryLoop, DeliveryThread, Dispatch, Dispatcher, Job};
pub use error::{DispatchError, GraphError};
pub use events::{Binder, Bus, Event, EventChannel, EventHandlers, SubscriptionId, WeakChannel};
pub use graph::{Graph, GraphClient, GraphExt, Handle, ObjectGraph, ScopeKey, TypeKey, ViewId};
pub use observers::{LifecycleEvent, LifecycleKind, Observe, ObserverSet};
pub use runtime::{Runtime, RuntimeBuilder};
pub use view::{
    Attach, Controller, ControllerScope, Ctx, LAST_ORIENTATION_KEY, ListenerId,
    NavigationSignals, Orchestrator, Orientation, Phase, Readiness, Reason, SavedState, Screen,
    ScreenState, Signals, View,
};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
