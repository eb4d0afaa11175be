//! Control and property nodes.

use serde::{Deserialize, Serialize};

/// TypedName is the (identifier, type) pair naming a control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedName {
    /// Identifier, unique among siblings.
    #[serde(rename = "name")]
    pub identifier: String,

    /// Control type tag, e.g. `Label` or `Gallery`.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Template variant of the control type. Not part of type identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl TypedName {
    /// Creates a new TypedName without a variant.
    pub fn new(identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        TypedName {
            identifier: identifier.into(),
            type_name: type_name.into(),
            variant: None,
        }
    }

    /// Returns true if both names carry the same type tag.
    pub fn same_type(&self, other: &TypedName) -> bool {
        self.type_name == other.type_name
    }
}

/// PropertyNode is a named property holding an opaque expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyNode {
    #[serde(rename = "name")]
    pub identifier: String,
    pub expression: String,
}

impl PropertyNode {
    /// Creates a new PropertyNode.
    pub fn new(identifier: impl Into<String>, expression: impl Into<String>) -> Self {
        PropertyNode {
            identifier: identifier.into(),
            expression: expression.into(),
        }
    }
}

/// ControlNode is a control block: a typed name, child controls and properties.
///
/// Children and properties keep their document order. Identifiers are
/// expected to be unique among siblings; the diff walker rejects trees that
/// break this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlNode {
    #[serde(flatten)]
    pub name: TypedName,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ControlNode>,
}

impl ControlNode {
    /// Creates a control with no children and no properties.
    pub fn new(identifier: impl Into<String>, type_name: impl Into<String>) -> Self {
        ControlNode {
            name: TypedName::new(identifier, type_name),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the template variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.name.variant = Some(variant.into());
        self
    }

    /// Appends a child control.
    pub fn with_child(mut self, child: ControlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a property.
    pub fn with_property(mut self, identifier: impl Into<String>, expression: impl Into<String>) -> Self {
        self.properties.push(PropertyNode::new(identifier, expression));
        self
    }

    /// Returns the control identifier.
    pub fn identifier(&self) -> &str {
        &self.name.identifier
    }

    /// Returns the control type tag.
    pub fn type_name(&self) -> &str {
        &self.name.type_name
    }

    /// Looks up a direct child by identifier.
    pub fn child(&self, identifier: &str) -> Option<&ControlNode> {
        self.children.iter().find(|c| c.identifier() == identifier)
    }

    /// Looks up a property by identifier.
    pub fn property(&self, identifier: &str) -> Option<&PropertyNode> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }

    /// Visits this control and every descendant, depth-first, children before parent.
    pub fn walk_post_order<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a ControlNode),
    {
        for child in &self.children {
            child.walk_post_order(f);
        }
        f(self);
    }
}

/// IrNode is a borrowed reference to any node kind in a control tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrNode<'a> {
    Control(&'a ControlNode),
    Property(&'a PropertyNode),
}

impl<'a> IrNode<'a> {
    /// Returns the node identifier.
    pub fn identifier(&self) -> &'a str {
        match self {
            IrNode::Control(c) => c.identifier(),
            IrNode::Property(p) => &p.identifier,
        }
    }

    /// Returns a short name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            IrNode::Control(_) => "control",
            IrNode::Property(_) => "property",
        }
    }
}

impl<'a> From<&'a ControlNode> for IrNode<'a> {
    fn from(node: &'a ControlNode) -> Self {
        IrNode::Control(node)
    }
}

impl<'a> From<&'a PropertyNode> for IrNode<'a> {
    fn from(node: &'a PropertyNode) -> Self {
        IrNode::Property(node)
    }
}
