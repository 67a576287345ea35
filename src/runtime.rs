//! # Runtime: the app-wide bundle every orchestrator is built from.
//!
//! ```text
//! Runtime::builder(cfg, dispatcher)
//!     .with_graph(graph)          (default: empty Graph)
//!     .with_screen(screen)        (default: ScreenState, portrait)
//!     .with_observers(vec![...])  (default: none)
//!     .build() ──► Arc<Runtime> { GraphClient, EventChannel, Bus, Dispatch, Screen, ObserverSet }
//! ```
//!
//! The runtime owns the only strong reference to the [`EventChannel`]; the [`Bus`]
//! holds it weakly, so dropping the runtime turns every later post into a logged drop.

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Dispatch;
use crate::events::{Bus, EventChannel};
use crate::graph::{Graph, GraphClient, ObjectGraph};
use crate::observers::{LifecycleEvent, Observe, ObserverSet};
use crate::view::{Screen, ScreenState};

/// Shared collaborators of every view in the app.
pub struct Runtime {
    cfg: Config,
    graph: GraphClient,
    channel: EventChannel,
    bus: Bus,
    screen: Arc<dyn Screen>,
    observers: ObserverSet,
}

impl Runtime {
    /// Starts building a runtime around `dispatcher`.
    pub fn builder(cfg: Config, dispatcher: Arc<dyn Dispatch>) -> RuntimeBuilder {
        RuntimeBuilder::new(cfg, dispatcher)
    }

    /// Configuration the runtime was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Graph adapter used to acquire and release controllers.
    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    /// Channel the views' binders subscribe to.
    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// Thread-aware poster; clone it into controllers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Dispatcher behind the bus.
    pub fn dispatcher(&self) -> &Arc<dyn Dispatch> {
        self.bus.dispatcher()
    }

    /// Current display orientation source.
    pub fn screen(&self) -> &Arc<dyn Screen> {
        &self.screen
    }

    pub(crate) fn emit(&self, event: LifecycleEvent) {
        if !self.observers.is_empty() {
            self.observers.emit(&event);
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("cfg", &self.cfg)
            .field("channel", &self.channel)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    cfg: Config,
    dispatcher: Arc<dyn Dispatch>,
    graph: Option<Arc<dyn ObjectGraph>>,
    screen: Option<Arc<dyn Screen>>,
    observers: Vec<Arc<dyn Observe>>,
}

impl RuntimeBuilder {
    /// Creates a new builder with the given configuration and dispatcher.
    pub fn new(cfg: Config, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            cfg,
            dispatcher,
            graph: None,
            screen: None,
            observers: Vec::new(),
        }
    }

    /// Sets the ownership graph controllers are acquired from.
    pub fn with_graph(mut self, graph: Arc<dyn ObjectGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Sets the orientation source.
    pub fn with_screen(mut self, screen: Arc<dyn Screen>) -> Self {
        self.screen = Some(screen);
        self
    }

    /// Sets lifecycle observers.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> Arc<Runtime> {
        let graph = self
            .graph
            .unwrap_or_else(|| Arc::new(Graph::new()) as Arc<dyn ObjectGraph>);
        let screen = self
            .screen
            .unwrap_or_else(|| Arc::new(ScreenState::default()) as Arc<dyn Screen>);

        let channel = EventChannel::new();
        let bus = Bus::new(&channel, self.dispatcher);

        Arc::new(Runtime {
            cfg: self.cfg,
            graph: GraphClient::new(graph),
            channel,
            bus,
            screen,
            observers: ObserverSet::new(self.observers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::view::Orientation;

    #[test]
    fn test_defaults() {
        let (dispatcher, _delivery) = Dispatcher::attach_current(&Config::default());
        let rt = Runtime::builder(Config::default(), Arc::new(dispatcher)).build();
        assert_eq!(rt.screen().orientation(), Orientation::Portrait);
        assert!(rt.channel().is_empty());
        assert!(rt.dispatcher().is_delivery_context());
    }

    #[test]
    fn test_custom_screen() {
        let (dispatcher, _delivery) = Dispatcher::attach_current(&Config::default());
        let screen = ScreenState::new(Orientation::Landscape);
        let rt = Runtime::builder(Config::default(), Arc::new(dispatcher))
            .with_screen(Arc::new(screen))
            .build();
        assert_eq!(rt.screen().orientation(), Orientation::Landscape);
    }
}
