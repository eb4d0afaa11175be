//! Gathering the control states of a subtree.

use super::{ControlState, ControlStateLookup};
use crate::ir::ControlNode;
use std::collections::BTreeMap;

/// ControlStates maps control identifiers to their states.
pub type ControlStates = BTreeMap<String, ControlState>;

/// Collects the stored state of every control in the subtree rooted at `root`.
///
/// Controls without a stored state are skipped but their descendants are
/// still visited. The result is keyed by control identifier.
pub fn collect_subtree_states<S>(root: &ControlNode, store: &S) -> ControlStates
where
    S: ControlStateLookup + ?Sized,
{
    let mut states = ControlStates::new();
    root.walk_post_order(&mut |node| {
        if let Some(state) = store.try_get_control_state(node.identifier()) {
            states.insert(node.identifier().to_string(), state.clone());
        }
    });
    states
}
