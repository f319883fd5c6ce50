// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{InterfaceProto, InterfaceType, JsonDisplay};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
/// Network configuration dialect of the host
pub enum OsFamily {
    /// Single `/etc/network/interfaces` file holding one stanza per
    /// interface.
    Debian,
    /// One `ifcfg-<name>` file per interface.
    Rhel,
}

impl OsFamily {
    /// The method meaning "no address configuration".
    pub fn no_proto(&self) -> InterfaceProto {
        match self {
            Self::Debian => InterfaceProto::Manual,
            Self::Rhel => InterfaceProto::None,
        }
    }

    pub fn supported_protos(&self) -> &'static [InterfaceProto] {
        match self {
            Self::Debian => &[
                InterfaceProto::Manual,
                InterfaceProto::Dhcp,
                InterfaceProto::Bootp,
                InterfaceProto::Loopback,
                InterfaceProto::Static,
                InterfaceProto::Ipv4ll,
            ],
            Self::Rhel => &[
                InterfaceProto::None,
                InterfaceProto::Dhcp,
                InterfaceProto::Bootp,
                InterfaceProto::Static,
            ],
        }
    }

    pub fn supported_types(&self) -> &'static [InterfaceType] {
        &InterfaceType::ALL
    }

    /// Debian persists an explicitly empty route set as a header-only
    /// route script, so it has to be added once. RHEL stores no route file
    /// at all for an empty set.
    pub fn keeps_empty_route_set(&self) -> bool {
        matches!(self, Self::Debian)
    }

    /// Detect the dialect from the content of `/etc/os-release`.
    pub fn from_os_release(content: &str) -> Option<Self> {
        let mut ids: Vec<String> = Vec::new();
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() == "ID" || key.trim() == "ID_LIKE" {
                let value = value.trim().trim_matches(['"', '\'']);
                ids.extend(value.split_whitespace().map(str::to_lowercase));
            }
        }
        if ids.iter().any(|id| id == "debian" || id == "ubuntu") {
            Some(Self::Debian)
        } else if ids
            .iter()
            .any(|id| matches!(id.as_str(), "rhel" | "fedora" | "centos"))
        {
            Some(Self::Rhel)
        } else {
            None
        }
    }
}
