//! # Logging observer for debugging and demos.
//!
//! [`LogWriter`] renders lifecycle records through `tracing` at `info` level.
//!
//! ## Output format (fmt subscriber)
//! ```text
//! INFO viewvisor: [created] view=view#1
//! INFO viewvisor: [ready] view=view#1 reason=[new_instance,first_time]
//! INFO viewvisor: [paused] view=view#1
//! INFO viewvisor: [returned-foreground] view=view#1
//! ```

use tracing::info;

use super::lifecycle::{LifecycleEvent, LifecycleKind};
use super::observer::Observe;

/// Tracing-backed lifecycle observer.
///
/// Enabled via the `logging` feature. Implement a custom [`Observe`] for anything
/// beyond human-readable output.
pub struct LogWriter;

impl Observe for LogWriter {
    fn on_event(&self, e: &LifecycleEvent) {
        let view = e.view;
        match e.kind {
            LifecycleKind::Ready => match e.reason {
                Some(reason) => info!(target: "viewvisor", "[ready] view={view} reason={reason}"),
                None => info!(target: "viewvisor", "[ready] view={view}"),
            },
            LifecycleKind::Created => info!(target: "viewvisor", "[created] view={view}"),
            LifecycleKind::ViewBound => info!(target: "viewvisor", "[view-bound] view={view}"),
            LifecycleKind::ReadyDeferred => {
                info!(target: "viewvisor", "[ready-deferred] view={view}")
            }
            LifecycleKind::Resumed => info!(target: "viewvisor", "[resumed] view={view}"),
            LifecycleKind::ReturnedForeground => {
                info!(target: "viewvisor", "[returned-foreground] view={view}")
            }
            LifecycleKind::Paused => info!(target: "viewvisor", "[paused] view={view}"),
            LifecycleKind::ViewUnbound => info!(target: "viewvisor", "[view-unbound] view={view}"),
            LifecycleKind::Destroyed => info!(target: "viewvisor", "[destroyed] view={view}"),
            LifecycleKind::PushedToBackStack => {
                info!(target: "viewvisor", "[pushed-to-back-stack] view={view}")
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
