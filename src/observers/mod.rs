//! Lifecycle observability: records, the observer trait and its fan-out.
//!
//! ## Contents
//! - [`LifecycleEvent`] / [`LifecycleKind`] one record per accepted native callback
//! - [`Observe`] extension trait
//! - [`ObserverSet`] panic-isolated fan-out
//! - `LogWriter` tracing renderer (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod lifecycle;
mod observer;
mod set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use lifecycle::{LifecycleEvent, LifecycleKind};
pub use observer::Observe;
pub use set::ObserverSet;
