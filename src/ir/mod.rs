//! IR module - Read-only model of a control tree.
//!
//! Control trees are produced by an external parser; this module only holds
//! the in-memory shape and the YAML/JSON loading used by tooling and tests.

mod node;

pub use node::*;

/// Parse a control tree from JSON.
pub fn from_json(json: &str) -> Result<ControlNode, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a control tree to JSON.
pub fn to_json(node: &ControlNode) -> Result<String, serde_json::Error> {
    serde_json::to_string(node)
}

/// Parse a control tree from YAML.
pub fn from_yaml(yaml: &str) -> Result<ControlNode, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a control tree to YAML.
pub fn to_yaml(node: &ControlNode) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(node)
}
