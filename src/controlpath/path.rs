//! Control path type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ControlPath is the ancestry chain of control identifiers leading to a node.
///
/// Paths are immutable values: [`ControlPath::append`] returns a new path and
/// leaves the receiver untouched. Equality, ordering and hashing are all by
/// segment sequence, so paths can key the groupings used when merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlPath {
    segments: Vec<String>,
}

impl ControlPath {
    /// Creates the empty path that denotes the document root.
    pub fn empty() -> Self {
        ControlPath {
            segments: Vec::new(),
        }
    }

    /// Creates a path from a list of identifiers, root first.
    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        ControlPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a new path with `identifier` as its final segment.
    pub fn append(&self, identifier: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(identifier.into());
        ControlPath { segments }
    }

    /// Returns the first segment, the control this path enters next.
    pub fn current(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Returns the path below the first segment.
    ///
    /// Calling this on the empty path yields the empty path.
    pub fn next(&self) -> Self {
        ControlPath {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the segments, root first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the last segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns the segments as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.segments
    }
}

impl<S: Into<String>> FromIterator<S> for ControlPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        ControlPath::from_segments(iter)
    }
}

impl IntoIterator for ControlPath {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a ControlPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.segments.join("."))
    }
}
