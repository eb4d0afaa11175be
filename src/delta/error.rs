//! Errors for malformed delta payloads.

use super::PropertyChangeKind;
use crate::controlpath::ControlPath;
use thiserror::Error;

/// DeltaError reports a delta whose fields contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    #[error("{path}: removed property '{property}' must not carry an expression")]
    UnexpectedExpression { path: ControlPath, property: String },

    #[error("{path}: {change:?} property '{property}' is missing its expression")]
    MissingExpression {
        path: ControlPath,
        property: String,
        change: PropertyChangeKind,
    },
}
