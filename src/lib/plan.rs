// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// What has to happen to the running interface after its configuration is
/// rewritten
pub enum StatusTransition {
    /// Nothing to do with the running interface.
    #[default]
    None,
    /// Interface was disabled and is desired to be enabled.
    BringUp,
    /// Interface was enabled and is desired to be disabled.
    BringDown,
    /// Interface stays enabled but other settings changed.
    RestartNeeded,
}

impl StatusTransition {
    /// Arguments of `apply_interface_state()`: desired enabled and
    /// needs restart. `None` when no OS command is required.
    pub fn to_apply_args(self) -> Option<(bool, bool)> {
        match self {
            Self::None => None,
            Self::BringUp => Some((true, false)),
            Self::BringDown => Some((false, false)),
            Self::RestartNeeded => Some((true, true)),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[non_exhaustive]
/// One differing attribute between current and desired state
pub struct ChangedField {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired: Option<String>,
}

impl ChangedField {
    pub fn new(
        field: &str,
        current: Option<String>,
        desired: Option<String>,
    ) -> Self {
        Self {
            field: field.to_string(),
            current,
            desired,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{}: {} -> {}",
            self.field,
            self.current.as_deref().unwrap_or("(none)"),
            self.desired.as_deref().unwrap_or("(none)")
        )
    }
}

/// Multi-line description of changed fields, one field per line.
pub fn describe_changes(changed: &[ChangedField]) -> String {
    changed
        .iter()
        .map(ChangedField::describe)
        .collect::<Vec<String>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Classified decision of how to converge actual state to desired state
pub enum Plan<T> {
    NoOp,
    Add(T),
    Update {
        desired: T,
        changed: Vec<ChangedField>,
        transition: StatusTransition,
    },
}

impl<T> Plan<T> {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    pub fn desired(&self) -> Option<&T> {
        match self {
            Self::NoOp => None,
            Self::Add(d) => Some(d),
            Self::Update { desired, .. } => Some(desired),
        }
    }
}
