// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Host wide network settings
pub struct GlobalNetworkSpec {
    /// Whether networking is configured on boot.
    pub enabled: bool,
    pub hostname: String,
}

impl GlobalNetworkSpec {
    pub fn new(enabled: bool, hostname: &str) -> Self {
        Self {
            enabled,
            hostname: hostname.to_string(),
        }
    }
}
