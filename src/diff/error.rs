//! Errors raised when input trees break the walker's structural invariants.

use crate::controlpath::ControlPath;
use std::fmt;
use thiserror::Error;

/// TreeSide names which of the two input trees an error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSide {
    Current,
    Base,
}

impl fmt::Display for TreeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSide::Current => write!(f, "current"),
            TreeSide::Base => write!(f, "base"),
        }
    }
}

/// DiffError reports a malformed input tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("{path}: duplicate control '{identifier}' in {side} tree")]
    DuplicateControl {
        path: ControlPath,
        identifier: String,
        side: TreeSide,
    },

    #[error("{path}: duplicate property '{identifier}' in {side} tree")]
    DuplicateProperty {
        path: ControlPath,
        identifier: String,
        side: TreeSide,
    },

    #[error("{path}: cannot compare {current} '{identifier}' with a base {base}")]
    NodeKindMismatch {
        path: ControlPath,
        identifier: String,
        current: &'static str,
        base: &'static str,
    },
}

impl DiffError {
    /// Creates a duplicate control error.
    pub fn duplicate_control(path: &ControlPath, identifier: impl Into<String>, side: TreeSide) -> Self {
        DiffError::DuplicateControl {
            path: path.clone(),
            identifier: identifier.into(),
            side,
        }
    }

    /// Creates a duplicate property error.
    pub fn duplicate_property(path: &ControlPath, identifier: impl Into<String>, side: TreeSide) -> Self {
        DiffError::DuplicateProperty {
            path: path.clone(),
            identifier: identifier.into(),
            side,
        }
    }

    /// Returns the path the error was detected at.
    pub fn path(&self) -> &ControlPath {
        match self {
            DiffError::DuplicateControl { path, .. }
            | DiffError::DuplicateProperty { path, .. }
            | DiffError::NodeKindMismatch { path, .. } => path,
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
