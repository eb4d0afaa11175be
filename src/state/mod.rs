//! State module - Editor state kept alongside the control tree.
//!
//! Control states are opaque to the diff engine. They are looked up by
//! control identifier and attached to deltas that introduce new subtrees, so
//! a later apply stage can restore them.

mod collect;
mod store;

pub use collect::*;
pub use store::*;
