//! # Cross-Thread Delivery Example
//!
//! Worker threads report progress through a cloned [`Bus`]; the view's handlers
//! always run on the delivery thread, which here is a current-thread tokio runtime
//! awaiting [`DeliveryLoop::run`]. A final `Finished` notification cancels the loop.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example cross_thread
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use tokio_util::sync::CancellationToken;
use viewvisor::{
    Bus, Config, Controller, Ctx, Dispatcher, EventHandlers, Graph, Orchestrator, Reason,
    Runtime, SavedState, View,
};

struct Progress {
    worker: u32,
    percent: u32,
}

struct Finished;

/// Starts the downloads once the view is ready.
struct DownloadController {
    bus: Bus,
}

impl Controller for DownloadController {
    fn on_view_ready(&self, reason: Reason, _orientation: viewvisor::Orientation) {
        if !reason.is_first_time() {
            return;
        }
        let handles: Vec<_> = (1..=3)
            .map(|worker| {
                let bus = self.bus.clone();
                thread::spawn(move || {
                    for percent in [25, 50, 75, 100] {
                        bus.post(Progress { worker, percent });
                    }
                })
            })
            .collect();

        let bus = self.bus.clone();
        thread::spawn(move || {
            for h in handles {
                let _ = h.join();
            }
            bus.post(Finished);
        });
    }
}

struct DownloadsView {
    done: Arc<AtomicU32>,
    stop: CancellationToken,
}

impl View for DownloadsView {
    type Controller = DownloadController;
    type Surface = ();

    fn handlers(&self, handlers: &mut EventHandlers) {
        let done = self.done.clone();
        handlers.on::<Progress>(move |p| {
            if p.percent == 100 {
                done.fetch_add(1, Ordering::Relaxed);
            }
            println!(
                "[{:?}] worker {} at {}%",
                thread::current().name().unwrap_or("?"),
                p.worker,
                p.percent
            );
        });
        let stop = self.stop.clone();
        handlers.on::<Finished>(move |_| stop.cancel());
    }

    fn on_view_ready(
        &mut self,
        _cx: &Ctx<'_, DownloadController>,
        _surface: &(),
        _saved: Option<&SavedState>,
        reason: Reason,
    ) {
        println!("downloads view ready {reason}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::default();
    let (dispatcher, delivery) = Dispatcher::attach_current(&cfg);
    let graph = Arc::new(Graph::new());
    let runtime = Runtime::builder(cfg, Arc::new(dispatcher))
        .with_graph(graph.clone())
        .build();

    let bus = runtime.bus().clone();
    graph.register(move |_| Ok(DownloadController { bus: bus.clone() }));

    let stop = CancellationToken::new();
    let done = Arc::new(AtomicU32::new(0));
    let mut view = Orchestrator::new(
        DownloadsView {
            done: done.clone(),
            stop: stop.clone(),
        },
        runtime,
    );
    view.on_created(None)?;
    view.on_view_bound((), None)?;
    view.on_resumed();

    delivery.run(stop).await;

    println!("{} worker(s) finished", done.load(Ordering::Relaxed));
    view.on_paused();
    view.on_view_unbound();
    view.on_destroyed();
    Ok(())
}
