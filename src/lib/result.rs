// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{describe_changes, ApplyOutcome, JsonDisplay, NetconvError, Plan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// What a reconcile call is about, used to phrase comments
pub enum Subject {
    Interface(String),
    Routes(String),
    GlobalSettings,
}

impl Subject {
    fn phrase(&self) -> String {
        match self {
            Self::Interface(name) => format!("Interface {name}"),
            Self::Routes(name) => format!("Interface {name} routes"),
            Self::GlobalSettings => "Global network settings".to_string(),
        }
    }

    fn is_plural(&self) -> bool {
        !matches!(self, Self::Interface(_))
    }

    fn up_to_date(&self) -> String {
        let verb = if self.is_plural() { "are" } else { "is" };
        format!("{} {verb} up to date.", self.phrase())
    }

    fn failure(&self, e: &NetconvError) -> String {
        let target = match self {
            Self::Interface(name) => format!("interface {name}"),
            Self::Routes(name) => format!("interface {name} routes"),
            Self::GlobalSettings => "global network settings".to_string(),
        };
        format!("Failed to reconcile {target}: {e}")
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[non_exhaustive]
/// Result reported to callers. `result` is `None` when running in dry-run
/// mode and changes would be made.
pub struct ReconcileResult {
    pub result: Option<bool>,
    pub comment: String,
    pub changes: BTreeMap<String, String>,
}

impl ReconcileResult {
    pub fn is_failure(&self) -> bool {
        self.result == Some(false)
    }

    pub fn is_indeterminate(&self) -> bool {
        self.result.is_none()
    }

    pub fn failure(subject: &Subject, error: &NetconvError) -> Self {
        Self {
            result: Some(false),
            comment: subject.failure(error),
            changes: BTreeMap::new(),
        }
    }

    pub fn from_outcome<T>(
        subject: &Subject,
        plan: &Plan<T>,
        outcome: ApplyOutcome,
    ) -> Self {
        if let Some(e) = outcome.error.as_ref() {
            return Self {
                result: Some(false),
                comment: subject.failure(e),
                changes: outcome.applied_changes,
            };
        }
        let phrase = subject.phrase();
        let verb = if subject.is_plural() { "are" } else { "is" };
        let (result, comment) = match (plan, outcome.dry_run) {
            (Plan::NoOp, _) => (Some(true), subject.up_to_date()),
            (Plan::Add(_), true) => {
                (None, format!("{phrase} {verb} set to be added."))
            }
            (Plan::Update { changed, .. }, true) => (
                None,
                format!(
                    "{phrase} {verb} set to be updated:\n{}",
                    describe_changes(changed)
                ),
            ),
            (Plan::Add(_), false) => (Some(true), format!("{phrase} added.")),
            (Plan::Update { .. }, false) => {
                (Some(true), format!("{phrase} updated."))
            }
        };
        Self {
            result,
            comment,
            changes: if outcome.dry_run {
                BTreeMap::new()
            } else {
                outcome.applied_changes
            },
        }
    }
}
