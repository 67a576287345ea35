//! # Graph - reference-counted registry of live controllers.
//!
//! Holds one instance per `(type, scope)` pair and counts how many owners
//! currently reference it.
//!
//! ## Architecture
//! ```text
//! acquire(ty, scope)
//!   ├─► live[(ty, scope)] exists ─► refs += 1 ─► same instance
//!   └─► missing ─► providers[ty] ─► build (no lock held) ─► refs = 1
//!                        └─► no provider ─► GraphError::Resolution
//!
//! release(handle, ty, scope)
//!   ├─► live[(ty, scope)] is `handle` ─► refs -= 1 ─► 0? drop instance ─► release its deps
//!   └─► otherwise ─► GraphError::ReleaseRace
//! ```
//!
//! ## Rules
//! - Providers run without any lock held, so they may acquire their own dependencies.
//! - What a provider acquires is recorded on the instance and released with it.
//! - If two acquisitions race to build the same key, the first inserted instance wins
//!   and the loser is dropped along with its dependencies.
//! - Dropping an instance happens after the lock is released.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::GraphError;

use super::key::{ScopeKey, TypeKey};
use super::object::{Handle, ObjectGraph};

type Provider = Arc<dyn Fn(&dyn ObjectGraph) -> Result<Handle, GraphError> + Send + Sync>;

/// One reference a provider took while building an instance.
struct Dependency {
    handle: Handle,
    ty: TypeKey,
    scope: ScopeKey,
}

/// A live instance with its reference count and the references it holds.
struct Entry {
    handle: Handle,
    refs: usize,
    deps: Vec<Dependency>,
}

/// Graph view handed to providers; remembers what they acquire.
struct Tracker<'a> {
    graph: &'a Graph,
    deps: Mutex<Vec<Dependency>>,
}

impl<'a> Tracker<'a> {
    fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            deps: Mutex::new(Vec::new()),
        }
    }

    fn into_deps(self) -> Vec<Dependency> {
        self.deps.into_inner()
    }
}

impl ObjectGraph for Tracker<'_> {
    fn acquire(&self, ty: TypeKey, scope: ScopeKey) -> Result<Handle, GraphError> {
        let handle = self.graph.acquire(ty, scope)?;
        self.deps.lock().push(Dependency {
            handle: handle.clone(),
            ty,
            scope,
        });
        Ok(handle)
    }

    fn release(&self, handle: &Handle, ty: TypeKey, scope: ScopeKey) -> Result<(), GraphError> {
        self.graph.release(handle, ty, scope)?;
        let mut deps = self.deps.lock();
        if let Some(pos) = deps
            .iter()
            .rposition(|d| d.ty == ty && d.scope == scope && same_instance(&d.handle, handle))
        {
            deps.remove(pos);
        }
        Ok(())
    }
}

/// Reference-counted, scope-keyed [`ObjectGraph`].
#[derive(Default)]
pub struct Graph {
    providers: RwLock<HashMap<TypeId, Provider>>,
    live: Mutex<HashMap<(TypeKey, ScopeKey), Entry>>,
}

impl Graph {
    /// Creates an empty graph (no providers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers how to build `C`. Replaces any previous provider for `C`.
    ///
    /// The provider receives the graph so it can acquire its own dependencies.
    pub fn register<C, F>(&self, provider: F)
    where
        C: Any + Send + Sync,
        F: Fn(&dyn ObjectGraph) -> Result<C, GraphError> + Send + Sync + 'static,
    {
        let erased: Provider = Arc::new(move |graph: &dyn ObjectGraph| {
            provider(graph).map(|c| Arc::new(c) as Handle)
        });
        self.providers.write().insert(TypeId::of::<C>(), erased);
    }

    /// True if a provider is registered for `C`.
    pub fn is_registered<C: Any>(&self) -> bool {
        self.providers.read().contains_key(&TypeId::of::<C>())
    }

    /// Current reference count for `(ty, scope)`; `0` when not live.
    pub fn ref_count(&self, ty: TypeKey, scope: ScopeKey) -> usize {
        self.live
            .lock()
            .get(&(ty, scope))
            .map(|e| e.refs)
            .unwrap_or(0)
    }

    /// Number of live instances across all types and scopes.
    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Gives back every reference a provider took, newest first.
    fn release_dependencies(&self, deps: Vec<Dependency>) {
        for dep in deps.into_iter().rev() {
            if let Err(err) = self.release(&dep.handle, dep.ty, dep.scope) {
                warn!(
                    controller = dep.ty.name(),
                    scope = %dep.scope,
                    label = err.as_label(),
                    "failed to release dependency: {err}"
                );
            }
        }
    }
}

impl ObjectGraph for Graph {
    fn acquire(&self, ty: TypeKey, scope: ScopeKey) -> Result<Handle, GraphError> {
        if let Some(entry) = self.live.lock().get_mut(&(ty, scope)) {
            entry.refs += 1;
            return Ok(entry.handle.clone());
        }

        let provider = self
            .providers
            .read()
            .get(&ty.id())
            .cloned()
            .ok_or(GraphError::Resolution {
                type_name: ty.name(),
            })?;

        let tracker = Tracker::new(self);
        let built = provider(&tracker);
        let deps = tracker.into_deps();
        let built = match built {
            Ok(built) => built,
            Err(err) => {
                self.release_dependencies(deps);
                return Err(err);
            }
        };

        let mut live = self.live.lock();
        let (handle, refs, loser) = match live.entry((ty, scope)) {
            MapEntry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                entry.refs += 1;
                (entry.handle.clone(), entry.refs, Some((built, deps)))
            }
            MapEntry::Vacant(slot) => {
                let entry = slot.insert(Entry {
                    handle: built,
                    refs: 1,
                    deps,
                });
                (entry.handle.clone(), entry.refs, None)
            }
        };
        drop(live);

        debug!(controller = ty.name(), %scope, refs, "controller acquired");
        if let Some((built, deps)) = loser {
            drop(built);
            self.release_dependencies(deps);
        }
        Ok(handle)
    }

    fn release(&self, handle: &Handle, ty: TypeKey, scope: ScopeKey) -> Result<(), GraphError> {
        let key = (ty, scope);
        let mut live = self.live.lock();

        let remaining = match live.get_mut(&key) {
            Some(entry) if same_instance(&entry.handle, handle) => {
                entry.refs -= 1;
                entry.refs
            }
            _ => {
                return Err(GraphError::ReleaseRace {
                    type_name: ty.name(),
                    scope,
                });
            }
        };

        let dropped = if remaining == 0 { live.remove(&key) } else { None };
        drop(live);

        debug!(controller = ty.name(), %scope, refs = remaining, "controller released");
        if let Some(entry) = dropped {
            let Entry { handle: instance, deps, .. } = entry;
            drop(instance);
            self.release_dependencies(deps);
        }
        Ok(())
    }
}

fn same_instance(a: &Handle, b: &Handle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphExt, ViewId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter;

    #[test]
    fn test_missing_provider_is_resolution_error() {
        let graph = Graph::new();
        let err = graph.acquire_as::<Counter>(ScopeKey::Shared).err();
        assert!(matches!(err, Some(GraphError::Resolution { .. })));
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_same_scope_shares_instance_and_counts_refs() {
        let graph = Graph::new();
        graph.register(|_| Ok(Counter));

        let a = graph.acquire_as::<Counter>(ScopeKey::Shared).unwrap();
        let b = graph.acquire_as::<Counter>(ScopeKey::Shared).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(graph.ref_count(TypeKey::of::<Counter>(), ScopeKey::Shared), 2);

        graph.release_as(&a, ScopeKey::Shared).unwrap();
        assert_eq!(graph.ref_count(TypeKey::of::<Counter>(), ScopeKey::Shared), 1);
        graph.release_as(&b, ScopeKey::Shared).unwrap();
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_view_scopes_are_isolated() {
        let graph = Graph::new();
        graph.register(|_| Ok(Counter));
        let v1 = ScopeKey::View(ViewId::next());
        let v2 = ScopeKey::View(ViewId::next());

        let a = graph.acquire_as::<Counter>(v1).unwrap();
        let b = graph.acquire_as::<Counter>(v2).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(graph.live_count(), 2);
    }

    #[test]
    fn test_double_release_is_a_race() {
        let graph = Graph::new();
        graph.register(|_| Ok(Counter));
        let a = graph.acquire_as::<Counter>(ScopeKey::Shared).unwrap();

        graph.release_as(&a, ScopeKey::Shared).unwrap();
        let err = graph.release_as(&a, ScopeKey::Shared).unwrap_err();
        assert_eq!(err.as_label(), "graph_release_race");
    }

    #[test]
    fn test_release_of_foreign_instance_is_a_race() {
        let graph = Graph::new();
        graph.register(|_| Ok(Counter));
        let _held = graph.acquire_as::<Counter>(ScopeKey::Shared).unwrap();

        let stranger = Arc::new(Counter);
        assert!(graph.release_as(&stranger, ScopeKey::Shared).is_err());
        assert_eq!(graph.ref_count(TypeKey::of::<Counter>(), ScopeKey::Shared), 1);
    }

    #[test]
    fn test_instance_rebuilt_after_last_release() {
        let builds = Arc::new(AtomicUsize::new(0));
        let graph = Graph::new();
        let seen = builds.clone();
        graph.register(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(Counter)
        });

        let a = graph.acquire_as::<Counter>(ScopeKey::Shared).unwrap();
        graph.release_as(&a, ScopeKey::Shared).unwrap();
        let _b = graph.acquire_as::<Counter>(ScopeKey::Shared).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_provider_can_acquire_dependencies() {
        struct Session;
        struct Login {
            session: Arc<Session>,
        }

        let graph = Graph::new();
        graph.register(|_| Ok(Session));
        graph.register(|g| {
            Ok(Login {
                session: g.acquire_as::<Session>(ScopeKey::Shared)?,
            })
        });

        let login = graph.acquire_as::<Login>(ScopeKey::Shared).unwrap();
        assert_eq!(graph.ref_count(TypeKey::of::<Session>(), ScopeKey::Shared), 1);
        assert!(Arc::strong_count(&login.session) >= 2);
    }

    #[test]
    fn test_failing_dependency_propagates_resolution() {
        struct Orphan;
        struct NeedsOrphan;

        let graph = Graph::new();
        graph.register(|g| {
            g.acquire_as::<Orphan>(ScopeKey::Shared)?;
            Ok(NeedsOrphan)
        });

        let err = graph
            .acquire_as::<NeedsOrphan>(ScopeKey::Shared)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Orphan"));
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_releasing_parent_releases_its_dependencies() {
        struct Session;
        struct Login {
            _session: Arc<Session>,
        }

        let graph = Graph::new();
        graph.register(|_| Ok(Session));
        graph.register(|g| {
            Ok(Login {
                _session: g.acquire_as::<Session>(ScopeKey::Shared)?,
            })
        });

        let login = graph.acquire_as::<Login>(ScopeKey::Shared).unwrap();
        assert_eq!(graph.live_count(), 2);
        assert_eq!(graph.ref_count(TypeKey::of::<Session>(), ScopeKey::Shared), 1);

        graph.release_as(&login, ScopeKey::Shared).unwrap();
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_dependency_outlives_parent_while_held_elsewhere() {
        struct Session;
        struct Login {
            _session: Arc<Session>,
        }

        let graph = Graph::new();
        graph.register(|_| Ok(Session));
        graph.register(|g| {
            Ok(Login {
                _session: g.acquire_as::<Session>(ScopeKey::Shared)?,
            })
        });

        let session = graph.acquire_as::<Session>(ScopeKey::Shared).unwrap();
        let login = graph.acquire_as::<Login>(ScopeKey::Shared).unwrap();
        assert_eq!(graph.ref_count(TypeKey::of::<Session>(), ScopeKey::Shared), 2);

        graph.release_as(&login, ScopeKey::Shared).unwrap();
        assert_eq!(graph.ref_count(TypeKey::of::<Session>(), ScopeKey::Shared), 1);
        graph.release_as(&session, ScopeKey::Shared).unwrap();
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_failed_build_returns_acquired_dependencies() {
        struct Session;
        struct Broken;

        let graph = Graph::new();
        graph.register(|_| Ok(Session));
        graph.register(|g| {
            g.acquire_as::<Session>(ScopeKey::Shared)?;
            Err::<Broken, _>(GraphError::Resolution {
                type_name: "settings",
            })
        });

        assert!(graph.acquire_as::<Broken>(ScopeKey::Shared).is_err());
        assert_eq!(graph.live_count(), 0);
    }

    #[test]
    fn test_losing_build_is_dropped_outside_lock() {
        use std::sync::Weak;
        use std::sync::atomic::AtomicBool;

        struct Heavy {
            graph: Weak<Graph>,
            live_at_drop: Arc<AtomicUsize>,
        }

        impl Drop for Heavy {
            fn drop(&mut self) {
                // Locks `live`; would deadlock if the caller still held it.
                if let Some(graph) = self.graph.upgrade() {
                    self.live_at_drop.store(graph.live_count(), Ordering::SeqCst);
                }
            }
        }

        let graph = Arc::new(Graph::new());
        let live_at_drop = Arc::new(AtomicUsize::new(usize::MAX));
        let nested = AtomicBool::new(false);
        let weak = Arc::downgrade(&graph);
        let seen = live_at_drop.clone();
        graph.register(move |g| {
            // The first build re-enters and lets the nested build win the slot.
            if !nested.swap(true, Ordering::SeqCst) {
                g.acquire_as::<Heavy>(ScopeKey::Shared)?;
            }
            Ok(Heavy {
                graph: weak.clone(),
                live_at_drop: seen.clone(),
            })
        });

        let heavy = graph.acquire_as::<Heavy>(ScopeKey::Shared).unwrap();
        assert_eq!(live_at_drop.load(Ordering::SeqCst), 1);
        assert_eq!(graph.ref_count(TypeKey::of::<Heavy>(), ScopeKey::Shared), 1);

        graph.release_as(&heavy, ScopeKey::Shared).unwrap();
        assert_eq!(graph.live_count(), 0);
    }
}
