//! Identity types for the ownership graph: which type, which scope, which view.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter for view identities.
static VIEW_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identity of one view instance (one orchestrator).
///
/// Unique for the lifetime of the process; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocates the next view identity.
    pub fn next() -> Self {
        Self(VIEW_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Builds an identity from a raw value (tests, hosts mirroring their own ids).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Partition key for controller instances.
///
/// - `Shared`: one instance for the whole app (every view asking for the type shares it).
/// - `View(id)`: one instance per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// App-wide scope.
    Shared,
    /// Scoped to a single view instance.
    View(ViewId),
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::Shared => write!(f, "shared"),
            ScopeKey::View(id) => write!(f, "{id}"),
        }
    }
}

/// Declared type of a controller: its `TypeId` plus a printable name.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name (diagnostics only).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
