//! Delta module - Edit operations produced by the diff walker.
//!
//! A delta list applied to the base tree reproduces the current tree. Deltas
//! are consumed by the conflict detection and apply stages.

mod delta;
mod deltas;
mod error;

pub use delta::*;
pub use deltas::*;
pub use error::*;
