//! Diff module - Structural comparison of a current control tree against a base.
//!
//! The walker aligns controls and properties by identifier, emitting
//! [`Delta`](crate::delta::Delta)s in a deterministic order.

mod error;
mod walker;

#[cfg(test)]
mod diff_test;

pub use error::*;
pub use walker::*;
