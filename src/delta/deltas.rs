//! Ordered delta collection.

use super::Delta;
use crate::controlpath::ControlPath;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Deltas is the ordered output of one diff.
///
/// Order is significant: a removal of a control always precedes the addition
/// that replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deltas {
    deltas: Vec<Delta>,
}

impl Deltas {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Deltas { deltas: Vec::new() }
    }

    /// Appends a delta.
    pub fn push(&mut self, delta: impl Into<Delta>) {
        self.deltas.push(delta.into());
    }

    /// Returns the number of deltas.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Returns true if there are no deltas.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Returns an iterator over the deltas in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Delta> {
        self.deltas.iter()
    }

    /// Returns the deltas as a slice.
    pub fn as_slice(&self) -> &[Delta] {
        &self.deltas
    }

    /// Returns the deltas anchored at `path`, in emission order.
    pub fn at_path<'a>(&'a self, path: &'a ControlPath) -> impl Iterator<Item = &'a Delta> + 'a {
        self.deltas.iter().filter(move |d| d.path() == path)
    }

    /// Groups the deltas by anchor path.
    ///
    /// Groups appear in the order their path was first seen and keep
    /// emission order inside each group.
    pub fn group_by_path(&self) -> Vec<(&ControlPath, Vec<&Delta>)> {
        let mut groups: Vec<(&ControlPath, Vec<&Delta>)> = Vec::new();
        let mut positions: HashMap<&ControlPath, usize> = HashMap::new();

        for delta in &self.deltas {
            let path = delta.path();
            match positions.get(path) {
                Some(&i) => groups[i].1.push(delta),
                None => {
                    positions.insert(path, groups.len());
                    groups.push((path, vec![delta]));
                }
            }
        }
        groups
    }
}

impl From<Vec<Delta>> for Deltas {
    fn from(deltas: Vec<Delta>) -> Self {
        Deltas { deltas }
    }
}

impl From<Deltas> for Vec<Delta> {
    fn from(deltas: Deltas) -> Self {
        deltas.deltas
    }
}

impl IntoIterator for Deltas {
    type Item = Delta;
    type IntoIter = std::vec::IntoIter<Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.into_iter()
    }
}

impl<'a> IntoIterator for &'a Deltas {
    type Item = &'a Delta;
    type IntoIter = std::slice::Iter<'a, Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

impl fmt::Display for Deltas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, delta) in self.deltas.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", delta)?;
        }
        Ok(())
    }
}
