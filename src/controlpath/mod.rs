//! Control path module - Locates controls within a control tree.
//!
//! A path is the chain of control identifiers from the document root down to
//! a control. Property names never appear in a path.

mod path;

pub use path::*;
