//! # GraphClient - the orchestrator's view of the ownership graph.
//!
//! Thin adapter over an [`ObjectGraph`] that is also the logging boundary:
//! - acquire failures are logged at `error` and returned (construction must abort);
//! - release races are logged at `warn` and swallowed (they are expected while the
//!   process tears down).

use std::any::Any;
use std::sync::Arc;

use tracing::{error, trace, warn};

use crate::error::GraphError;

use super::key::{ScopeKey, TypeKey};
use super::object::{GraphExt, ObjectGraph};

/// Cloneable handle to a shared [`ObjectGraph`].
#[derive(Clone)]
pub struct GraphClient {
    graph: Arc<dyn ObjectGraph>,
}

impl GraphClient {
    /// Wraps a graph.
    pub fn new(graph: Arc<dyn ObjectGraph>) -> Self {
        Self { graph }
    }

    /// Access to the wrapped graph.
    pub fn graph(&self) -> &Arc<dyn ObjectGraph> {
        &self.graph
    }

    /// Acquires the `C` instance for `scope`.
    pub fn acquire<C: Any + Send + Sync>(&self, scope: ScopeKey) -> Result<Arc<C>, GraphError> {
        self.graph.acquire_as::<C>(scope).inspect_err(|err| {
            error!(
                controller = TypeKey::of::<C>().name(),
                %scope,
                label = err.as_label(),
                "{err}"
            );
        })
    }

    /// Releases one reference to `instance` for `scope`.
    ///
    /// Never fails: a [`GraphError::ReleaseRace`] is logged and ignored.
    pub fn release<C: Any + Send + Sync>(&self, instance: &Arc<C>, scope: ScopeKey) {
        match self.graph.release_as(instance, scope) {
            Ok(()) => trace!(controller = TypeKey::of::<C>().name(), %scope, "released"),
            Err(err) => warn!(
                controller = TypeKey::of::<C>().name(),
                %scope,
                label = err.as_label(),
                "failed to release controller: {err}"
            ),
        }
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    struct Prefs;

    #[test]
    fn test_release_race_is_swallowed() {
        let graph = Arc::new(Graph::new());
        graph.register(|_| Ok(Prefs));
        let client = GraphClient::new(graph.clone());

        let prefs = client.acquire::<Prefs>(ScopeKey::Shared).unwrap();
        client.release(&prefs, ScopeKey::Shared);
        // second release would be a race: must not panic or propagate
        client.release(&prefs, ScopeKey::Shared);
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_resolution_error_is_returned() {
        let client = GraphClient::new(Arc::new(Graph::new()));
        let err = client.acquire::<Prefs>(ScopeKey::Shared).err();
        assert!(matches!(err, Some(GraphError::Resolution { .. })));
    }
}
