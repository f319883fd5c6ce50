// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{GlobalNetworkSpec, InterfaceSpec, RouteEntry};

/// Actual state read from the host, `Absent` when nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrentState<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> CurrentState<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Absent => None,
            Self::Present(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for CurrentState<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::Present(v),
            None => Self::Absent,
        }
    }
}

pub type ActualInterfaceState = CurrentState<InterfaceSpec>;
pub type ActualRoutes = CurrentState<Vec<RouteEntry>>;
pub type ActualGlobalSettings = CurrentState<GlobalNetworkSpec>;
