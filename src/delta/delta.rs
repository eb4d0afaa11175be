//! Delta variants.

use super::DeltaError;
use crate::controlpath::ControlPath;
use crate::ir::ControlNode;
use crate::state::ControlStates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// AddControl introduces a whole subtree under `parent_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddControl {
    /// Path to the control that receives the new child.
    pub parent_path: ControlPath,
    /// The added control, including everything beneath it.
    pub control: ControlNode,
    /// Stored editor state for every control in `control` that had one.
    #[serde(default)]
    pub states: ControlStates,
    pub in_component: bool,
}

impl AddControl {
    /// Creates a new AddControl.
    pub fn new(parent_path: ControlPath, control: ControlNode, states: ControlStates, in_component: bool) -> Self {
        AddControl {
            parent_path,
            control,
            states,
            in_component,
        }
    }
}

/// RemoveControl drops the child `identifier` (and its subtree) from `parent_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveControl {
    pub parent_path: ControlPath,
    pub identifier: String,
    pub in_component: bool,
}

impl RemoveControl {
    /// Creates a new RemoveControl.
    pub fn new(parent_path: ControlPath, identifier: impl Into<String>, in_component: bool) -> Self {
        RemoveControl {
            parent_path,
            identifier: identifier.into(),
            in_component,
        }
    }
}

/// PropertyChangeKind says how a property differs from the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyChangeKind {
    /// Present only in the current tree.
    Added,
    /// Present in both with different expression text.
    Modified,
    /// Present only in the base tree.
    Removed,
}

/// ChangeProperty sets or removes one property of the control at `control_path`.
///
/// `expression` is `None` exactly when the property was removed. Payloads
/// breaking this are rejected on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ChangePropertyFields")]
pub struct ChangeProperty {
    pub control_path: ControlPath,
    pub property: String,
    pub change: PropertyChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    pub in_component: bool,
}

impl ChangeProperty {
    /// A property that exists only in the current tree.
    pub fn added(
        control_path: ControlPath,
        property: impl Into<String>,
        expression: impl Into<String>,
        in_component: bool,
    ) -> Self {
        ChangeProperty {
            control_path,
            property: property.into(),
            change: PropertyChangeKind::Added,
            expression: Some(expression.into()),
            in_component,
        }
    }

    /// A property whose expression text changed.
    pub fn modified(
        control_path: ControlPath,
        property: impl Into<String>,
        expression: impl Into<String>,
        in_component: bool,
    ) -> Self {
        ChangeProperty {
            control_path,
            property: property.into(),
            change: PropertyChangeKind::Modified,
            expression: Some(expression.into()),
            in_component,
        }
    }

    /// A property that exists only in the base tree.
    pub fn removed(control_path: ControlPath, property: impl Into<String>, in_component: bool) -> Self {
        ChangeProperty {
            control_path,
            property: property.into(),
            change: PropertyChangeKind::Removed,
            expression: None,
            in_component,
        }
    }

    /// Returns true if the property was removed.
    pub fn was_removed(&self) -> bool {
        self.change == PropertyChangeKind::Removed
    }
}

/// Unchecked wire form of [`ChangeProperty`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePropertyFields {
    control_path: ControlPath,
    property: String,
    change: PropertyChangeKind,
    #[serde(default)]
    expression: Option<String>,
    in_component: bool,
}

impl TryFrom<ChangePropertyFields> for ChangeProperty {
    type Error = DeltaError;

    fn try_from(fields: ChangePropertyFields) -> Result<Self, Self::Error> {
        match (fields.change, &fields.expression) {
            (PropertyChangeKind::Removed, Some(_)) => {
                return Err(DeltaError::UnexpectedExpression {
                    path: fields.control_path,
                    property: fields.property,
                })
            }
            (change, None) if change != PropertyChangeKind::Removed => {
                return Err(DeltaError::MissingExpression {
                    path: fields.control_path,
                    property: fields.property,
                    change,
                })
            }
            _ => {}
        }
        Ok(ChangeProperty {
            control_path: fields.control_path,
            property: fields.property,
            change: fields.change,
            expression: fields.expression,
            in_component: fields.in_component,
        })
    }
}

/// Delta is one edit operation against the base tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Delta {
    AddControl(AddControl),
    RemoveControl(RemoveControl),
    ChangeProperty(ChangeProperty),
}

impl Delta {
    /// Returns the path the delta is anchored at.
    ///
    /// For control additions and removals this is the parent's path; for
    /// property changes it is the owning control's path.
    pub fn path(&self) -> &ControlPath {
        match self {
            Delta::AddControl(d) => &d.parent_path,
            Delta::RemoveControl(d) => &d.parent_path,
            Delta::ChangeProperty(d) => &d.control_path,
        }
    }

    /// Returns the identifier of the control or property the delta targets.
    pub fn target(&self) -> &str {
        match self {
            Delta::AddControl(d) => d.control.identifier(),
            Delta::RemoveControl(d) => &d.identifier,
            Delta::ChangeProperty(d) => &d.property,
        }
    }

    /// Returns true if the delta was produced inside a component definition.
    pub fn in_component(&self) -> bool {
        match self {
            Delta::AddControl(d) => d.in_component,
            Delta::RemoveControl(d) => d.in_component,
            Delta::ChangeProperty(d) => d.in_component,
        }
    }

    pub fn as_add_control(&self) -> Option<&AddControl> {
        match self {
            Delta::AddControl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_remove_control(&self) -> Option<&RemoveControl> {
        match self {
            Delta::RemoveControl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_change_property(&self) -> Option<&ChangeProperty> {
        match self {
            Delta::ChangeProperty(d) => Some(d),
            _ => None,
        }
    }
}

impl From<AddControl> for Delta {
    fn from(d: AddControl) -> Self {
        Delta::AddControl(d)
    }
}

impl From<RemoveControl> for Delta {
    fn from(d: RemoveControl) -> Self {
        Delta::RemoveControl(d)
    }
}

impl From<ChangeProperty> for Delta {
    fn from(d: ChangeProperty) -> Self {
        Delta::ChangeProperty(d)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::AddControl(d) => {
                write!(
                    f,
                    "+ {} {} ({})",
                    d.parent_path,
                    d.control.identifier(),
                    d.control.type_name()
                )?;
                if !d.states.is_empty() {
                    write!(f, " [{} state(s)]", d.states.len())?;
                }
            }
            Delta::RemoveControl(d) => write!(f, "- {} {}", d.parent_path, d.identifier)?,
            Delta::ChangeProperty(d) => match d.change {
                PropertyChangeKind::Removed => write!(f, "~ {} {} removed", d.control_path, d.property)?,
                PropertyChangeKind::Added | PropertyChangeKind::Modified => write!(
                    f,
                    "~ {} {} = {}",
                    d.control_path,
                    d.property,
                    d.expression.as_deref().unwrap_or_default()
                )?,
            },
        }
        if self.in_component() {
            write!(f, " (component)")?;
        }
        Ok(())
    }
}
