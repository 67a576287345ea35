//! Process-wide delivery dispatcher.
//!
//! A host installs its dispatcher once at startup; it then lives for the rest of
//! the process. Library code never looks it up implicitly: orchestrators receive
//! their dispatcher through [`Runtime`](crate::Runtime). The global slot exists
//! for host glue that has no other way to reach the delivery thread (e.g. native
//! callbacks registered before any runtime exists).

use std::sync::OnceLock;

use super::dispatcher::Dispatcher;

static DELIVERY: OnceLock<Dispatcher> = OnceLock::new();

/// Installs the process-wide dispatcher.
///
/// Returns the rejected dispatcher if one is already installed; the slot is never
/// cleared or replaced.
pub fn install(dispatcher: Dispatcher) -> Result<(), Dispatcher> {
    DELIVERY.set(dispatcher)
}

/// The process-wide dispatcher, if one was installed.
pub fn installed() -> Option<&'static Dispatcher> {
    DELIVERY.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_install_is_once() {
        let (first, _first_loop) = Dispatcher::attach_current(&Config::default());
        let (second, _second_loop) = Dispatcher::attach_current(&Config::default());

        // another test may have installed already; either way the second attempt fails
        let _ = install(first);
        assert!(installed().is_some());
        assert!(install(second).is_err());
    }
}
