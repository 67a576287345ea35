//! # Rotation Example
//!
//! Drives one view through the callbacks a host toolkit would deliver:
//! first show, background and foreground, rotation, back stack, then process
//! death and restoration. The `LogWriter` observer prints every lifecycle record.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example rotation --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use viewvisor::{
    Attach, Config, Controller, ControllerScope, Ctx, Dispatcher, Graph, LogWriter, Observe,
    Orchestrator, Orientation, Reason, Runtime, SavedState, ScreenState, View,
};

/// Counts how often the view asked for fresh data.
#[derive(Default)]
struct CounterController {
    loads: AtomicU32,
}

impl Controller for CounterController {
    fn on_view_ready(&self, reason: Reason, _orientation: Orientation) {
        if reason.is_first_time() || reason.is_restored() {
            self.loads.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_orientation_changed(&self, previous: Orientation, current: Orientation) {
        println!("  controller: layout {previous} -> {current}");
    }
}

struct CounterView;

impl View for CounterView {
    type Controller = CounterController;
    type Surface = &'static str;

    fn controller_scope(&self) -> ControllerScope {
        ControllerScope::PerView
    }

    fn on_view_ready(
        &mut self,
        _cx: &Ctx<'_, CounterController>,
        surface: &&'static str,
        _saved: Option<&SavedState>,
        reason: Reason,
    ) {
        println!("  view: {surface} ready {reason}");
    }

    fn on_return_foreground(&mut self, _cx: &Ctx<'_, CounterController>) {
        println!("  view: back in the foreground");
    }

    fn update(&mut self, cx: &Ctx<'_, CounterController>) {
        println!("  view: showing {} load(s)", cx.controller().loads.load(Ordering::Relaxed));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::default();
    let (dispatcher, mut delivery) = Dispatcher::attach_current(&cfg);

    let graph = Arc::new(Graph::new());
    graph.register(|_| Ok(CounterController::default()));
    let screen = ScreenState::new(Orientation::Portrait);

    let runtime = Runtime::builder(cfg, Arc::new(dispatcher))
        .with_graph(graph.clone())
        .with_screen(Arc::new(screen.clone()))
        .with_observers(vec![Arc::new(LogWriter) as Arc<dyn Observe>])
        .build();

    println!("first show");
    let mut counter = Orchestrator::new(CounterView, runtime.clone());
    counter.on_created(None)?;
    counter.on_view_bound("portrait-layout", None)?;
    counter.on_resumed();

    println!("home button, then back");
    counter.on_paused();
    counter.on_resumed();

    println!("rotate");
    counter.on_paused();
    counter.on_view_unbound();
    screen.set(Orientation::Landscape);
    counter.on_view_bound("landscape-layout", None)?;
    counter.on_resumed();

    println!("navigate away and come back");
    counter.push_to_back_stack();
    counter.on_paused();
    counter.on_view_unbound();
    counter.mark_about_to_pop_out();
    counter.on_view_bound("landscape-layout", None)?;
    counter.on_resumed();

    println!("process death");
    let mut saved = SavedState::new();
    counter.on_save_state(&mut saved);
    counter.on_paused();
    counter.on_view_unbound();
    counter.on_destroyed();
    screen.set(Orientation::Portrait);

    let mut restored = Orchestrator::new(CounterView, runtime);
    restored.set_defer_attach(true);
    restored.on_created(Some(&saved))?;
    if let Attach::Deferred = restored.on_view_bound("portrait-layout", Some(&saved))? {
        println!("  container restoring children first");
        restored.run_deferred_ready();
    }
    restored.on_resumed();

    delivery.pump();
    restored.on_paused();
    restored.on_view_unbound();
    restored.on_destroyed();
    println!("live controllers: {}", graph.live_count());
    Ok(())
}
