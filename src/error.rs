//! Error types used by the viewvisor runtime.
//!
//! This module defines two error enums:
//!
//! - [`GraphError`]: failures of the ownership graph (acquire/release of controllers).
//! - [`DispatchError`]: failures to reach the delivery context.
//!
//! Both provide `as_label` / `as_message` helpers for logs. Only
//! [`GraphError::Resolution`] and [`GraphError::TypeMismatch`] ever reach application code;
//! the other variants are consumed by logging boundaries ([`GraphClient`](crate::GraphClient),
//! [`Bus`](crate::Bus), [`Dispatcher`](crate::Dispatcher)).

use thiserror::Error;

use crate::graph::ScopeKey;

/// # Errors produced by the ownership graph.
///
/// - `Resolution` and `TypeMismatch` are programmer errors: view construction is aborted.
/// - `ReleaseRace` is expected under concurrent teardown and is swallowed (logged) by
///   [`GraphClient`](crate::GraphClient).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No provider is registered for the requested controller type.
    #[error(
        "unable to find controller `{type_name}`; register a provider for it with Graph::register"
    )]
    Resolution {
        /// Fully qualified name of the requested type.
        type_name: &'static str,
    },

    /// The handle was never acquired for this key, or was already released.
    #[error("controller `{type_name}` is not held for scope {scope}")]
    ReleaseRace {
        /// Fully qualified name of the released type.
        type_name: &'static str,
        /// Scope the release was attempted for.
        scope: ScopeKey,
    },

    /// The graph handed back an instance of a different concrete type.
    #[error("graph returned an instance that is not a `{type_name}`")]
    TypeMismatch {
        /// Fully qualified name of the requested type.
        type_name: &'static str,
    },
}

impl GraphError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use viewvisor::GraphError;
    ///
    /// let err = GraphError::Resolution { type_name: "app::LoginController" };
    /// assert_eq!(err.as_label(), "graph_resolution");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GraphError::Resolution { .. } => "graph_resolution",
            GraphError::ReleaseRace { .. } => "graph_release_race",
            GraphError::TypeMismatch { .. } => "graph_type_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GraphError::Resolution { type_name } => format!("no provider: {type_name}"),
            GraphError::ReleaseRace { type_name, scope } => {
                format!("release race: {type_name} scope={scope}")
            }
            GraphError::TypeMismatch { type_name } => format!("type mismatch: {type_name}"),
        }
    }

    /// Indicates whether the error must abort view construction.
    ///
    /// ```
    /// use viewvisor::{GraphError, ScopeKey};
    ///
    /// assert!(GraphError::Resolution { type_name: "x" }.is_fatal());
    /// assert!(!GraphError::ReleaseRace { type_name: "x", scope: ScopeKey::Shared }.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GraphError::ReleaseRace { .. })
    }
}

/// # Errors produced while handing work to the delivery context.
///
/// Never returned to producers: logged at the point of detection and the work is dropped.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The delivery loop or the event channel is gone.
    #[error("delivery target unavailable: {reason}")]
    TargetUnavailable {
        /// What was missing (e.g. "delivery loop closed", "event channel dropped").
        reason: &'static str,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::TargetUnavailable { .. } => "dispatch_target_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::TargetUnavailable { reason } => format!("dropped: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ViewId;

    #[test]
    fn test_labels_are_stable() {
        let race = GraphError::ReleaseRace {
            type_name: "a::B",
            scope: ScopeKey::View(ViewId::from_raw(7)),
        };
        assert_eq!(race.as_label(), "graph_release_race");
        assert_eq!(race.as_message(), "release race: a::B scope=view#7");
        assert_eq!(
            DispatchError::TargetUnavailable { reason: "gone" }.as_label(),
            "dispatch_target_unavailable"
        );
    }

    #[test]
    fn test_resolution_message_names_the_type() {
        let err = GraphError::Resolution { type_name: "app::Missing" };
        assert!(err.to_string().contains("app::Missing"));
        assert!(err.is_fatal());
    }
}
