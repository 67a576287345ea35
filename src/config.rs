//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the delivery context.
//!
//! Config is used in two ways:
//! 1. **Dispatcher creation**: `Dispatcher::attach_current(&config)` / `Dispatcher::spawn(&config)`
//! 2. **Runtime creation**: `Runtime::builder(config, dispatcher)`
//!
//! ## Sentinel values
//! - `queue_warn_depth = 0` → never warn about queue depth

/// Global configuration for the viewvisor runtime.
///
/// ## Field semantics
/// - `thread_name`: name of the delivery thread started by `Dispatcher::spawn`
/// - `queue_warn_depth`: queued-job count above which a warning is logged (`0` = disabled)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name given to the delivery thread created by `Dispatcher::spawn`.
    ///
    /// Ignored by `Dispatcher::attach_current`, where the calling thread keeps its name.
    pub thread_name: String,

    /// Number of jobs waiting for the delivery context above which each further
    /// cross-thread hand-off logs a warning.
    ///
    /// - `0` = disabled
    /// - `n > 0` = warn while more than `n` jobs are queued
    ///
    /// The queue itself is unbounded; this is a diagnostic for a stalled delivery loop.
    pub queue_warn_depth: usize,
}

impl Config {
    /// Returns the queue warning threshold as an `Option`.
    ///
    /// - `None` → never warn
    /// - `Some(n)` → warn above `n` queued jobs
    #[inline]
    pub fn queue_warn_threshold(&self) -> Option<usize> {
        if self.queue_warn_depth == 0 {
            None
        } else {
            Some(self.queue_warn_depth)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `thread_name = "viewvisor-delivery"`
    /// - `queue_warn_depth = 1024`
    fn default() -> Self {
        Self {
            thread_name: "viewvisor-delivery".to_string(),
            queue_warn_depth: 1024,
        }
    }
}
