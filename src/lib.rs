//! # Control Merge Diff
//!
//! Structural diffing of UI control trees for three-way merging.
//!
//! Given the current and base versions of a control tree, this library
//! computes the ordered list of deltas that turns the base into the current
//! tree. Editor state kept outside the tree is attached to deltas that
//! introduce new controls, so it survives the later merge and apply stages.
//!
//! ## Modules
//!
//! - [`controlpath`] - Paths locating controls within a tree
//! - [`ir`] - Read-only control and property node model
//! - [`state`] - Editor control state records, lookup and subtree collection
//! - [`delta`] - Delta operations produced by a diff
//! - [`diff`] - The diff walker

pub mod controlpath;
pub mod delta;
pub mod diff;
pub mod ir;
pub mod state;

pub use controlpath::ControlPath;
pub use delta::{AddControl, ChangeProperty, Delta, DeltaError, Deltas, PropertyChangeKind, RemoveControl};
pub use diff::{compute_delta, ControlDiff, ControlDiffBuilder, DiffError, DiffResult};
pub use ir::{ControlNode, IrNode, PropertyNode, TypedName};
pub use state::{collect_subtree_states, ControlState, ControlStateLookup, ControlStates, EditorStateStore};
