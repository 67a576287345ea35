//! Ownership graph: scoped, reference-counted controller instances.
//!
//! ## Contents
//! - [`ObjectGraph`], [`GraphExt`] the acquire/release contract and its typed helpers
//! - [`Graph`] reference-counted implementation with per-type providers
//! - [`GraphClient`] adapter used by orchestrators (logging boundary for release races)
//! - [`ScopeKey`], [`TypeKey`], [`ViewId`] identities

mod client;
mod key;
mod object;
mod registry;

pub use client::GraphClient;
pub use key::{ScopeKey, TypeKey, ViewId};
pub use object::{GraphExt, Handle, ObjectGraph};
pub use registry::Graph;
