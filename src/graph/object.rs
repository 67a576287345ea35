//! # Ownership graph contract.
//!
//! [`ObjectGraph`] is the seam between viewvisor and whatever owns controller
//! instances. viewvisor only ever calls `acquire` / `release`; how instances are
//! built (and how their own dependencies are resolved) is the graph's business.
//!
//! ## Rules
//! - every successful `acquire` must be matched by exactly one `release` with the
//!   same type and scope;
//! - `release` of something that is not held fails with [`GraphError::ReleaseRace`];
//! - callers stay on the delivery context (see [`crate::dispatch`]).

use std::any::Any;
use std::sync::Arc;

use tracing::warn;

use crate::error::GraphError;

use super::key::{ScopeKey, TypeKey};

/// Type-erased controller instance as stored by a graph.
pub type Handle = Arc<dyn Any + Send + Sync>;

/// Acquire/release interface of the ownership graph.
pub trait ObjectGraph: Send + Sync {
    /// Returns the instance of `ty` for `scope`, creating it on first use.
    ///
    /// Fails with [`GraphError::Resolution`] when nothing can provide `ty`.
    fn acquire(&self, ty: TypeKey, scope: ScopeKey) -> Result<Handle, GraphError>;

    /// Gives back one reference obtained from [`acquire`](Self::acquire).
    fn release(&self, handle: &Handle, ty: TypeKey, scope: ScopeKey) -> Result<(), GraphError>;
}

/// Typed helpers over any [`ObjectGraph`], including `dyn ObjectGraph`.
///
/// Providers use these to pull in their own dependencies:
/// ```
/// use std::sync::Arc;
/// use viewvisor::{Graph, GraphExt, ScopeKey};
///
/// struct Session;
/// struct Login { session: Arc<Session> }
///
/// let graph = Graph::new();
/// graph.register(|_| Ok(Session));
/// graph.register(|g| Ok(Login { session: g.acquire_as::<Session>(ScopeKey::Shared)? }));
///
/// let login = graph.acquire_as::<Login>(ScopeKey::Shared).unwrap();
/// assert!(Arc::ptr_eq(&login.session, &graph.acquire_as::<Session>(ScopeKey::Shared).unwrap()));
/// ```
pub trait GraphExt {
    /// Typed [`ObjectGraph::acquire`].
    fn acquire_as<C: Any + Send + Sync>(&self, scope: ScopeKey) -> Result<Arc<C>, GraphError>;

    /// Typed [`ObjectGraph::release`].
    fn release_as<C: Any + Send + Sync>(
        &self,
        instance: &Arc<C>,
        scope: ScopeKey,
    ) -> Result<(), GraphError>;
}

impl<G: ObjectGraph + ?Sized> GraphExt for G {
    fn acquire_as<C: Any + Send + Sync>(&self, scope: ScopeKey) -> Result<Arc<C>, GraphError> {
        let ty = TypeKey::of::<C>();
        let handle = self.acquire(ty, scope)?;
        match handle.downcast::<C>() {
            Ok(instance) => Ok(instance),
            Err(handle) => {
                // Give the reference back before reporting.
                if let Err(err) = self.release(&handle, ty, scope) {
                    warn!(
                        controller = ty.name(),
                        %scope,
                        label = err.as_label(),
                        "failed to return mismatched instance: {err}"
                    );
                }
                Err(GraphError::TypeMismatch {
                    type_name: ty.name(),
                })
            }
        }
    }

    fn release_as<C: Any + Send + Sync>(
        &self,
        instance: &Arc<C>,
        scope: ScopeKey,
    ) -> Result<(), GraphError> {
        let handle: Handle = instance.clone();
        self.release(&handle, TypeKey::of::<C>(), scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out a `u32` for every key and refuses every release.
    #[derive(Default)]
    struct Mislabeled {
        releases: AtomicUsize,
    }

    impl ObjectGraph for Mislabeled {
        fn acquire(&self, _ty: TypeKey, _scope: ScopeKey) -> Result<Handle, GraphError> {
            Ok(Arc::new(7u32))
        }

        fn release(&self, _handle: &Handle, ty: TypeKey, scope: ScopeKey) -> Result<(), GraphError> {
            self.releases.fetch_add(1, Ordering::SeqCst);
            Err(GraphError::ReleaseRace {
                type_name: ty.name(),
                scope,
            })
        }
    }

    #[test]
    fn test_type_mismatch_gives_the_reference_back() {
        let graph = Mislabeled::default();
        let err = graph.acquire_as::<String>(ScopeKey::Shared).unwrap_err();

        assert!(matches!(err, GraphError::TypeMismatch { .. }));
        assert_eq!(graph.releases.load(Ordering::SeqCst), 1);
    }
}
