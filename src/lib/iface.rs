// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

pub(crate) const LOOPBACK_IFACE_NAME: &str = "lo";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonDisplay,
)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
/// Address configuration method of an interface
pub enum InterfaceProto {
    /// No protocol on RHEL dialect.
    None,
    /// No protocol on Debian dialect.
    Manual,
    Dhcp,
    Bootp,
    Loopback,
    Static,
    /// IPv4 link-local (Debian dialect only).
    Ipv4ll,
}

impl InterfaceProto {
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Manual,
        Self::Dhcp,
        Self::Bootp,
        Self::Loopback,
        Self::Static,
        Self::Ipv4ll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Manual => "manual",
            Self::Dhcp => "dhcp",
            Self::Bootp => "bootp",
            Self::Loopback => "loopback",
            Self::Static => "static",
            Self::Ipv4ll => "ipv4ll",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonDisplay,
)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
/// Interface type
pub enum InterfaceType {
    /// Ethernet interface.
    Eth,
    /// Loopback interface, only valid for `lo`.
    Loopback,
    /// Bond interface, requires the `bonding` kernel module.
    Bond,
    /// VLAN interface named `<parent>.<vlan_id>`, requires the `8021q`
    /// kernel module.
    Vlan,
    /// Linux bridge.
    Bridge,
    /// IP alias named `<parent>:<label>`.
    Alias,
}

impl InterfaceType {
    pub const ALL: [Self; 6] = [
        Self::Eth,
        Self::Loopback,
        Self::Bond,
        Self::Vlan,
        Self::Bridge,
        Self::Alias,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eth => "eth",
            Self::Loopback => "loopback",
            Self::Bond => "bond",
            Self::Vlan => "vlan",
            Self::Bridge => "bridge",
            Self::Alias => "alias",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Kernel module required before interface of this type can be up.
    pub(crate) fn kernel_module(&self) -> Option<&'static str> {
        match self {
            Self::Bond => Some("bonding"),
            Self::Vlan => Some("8021q"),
            _ => None,
        }
    }
}

/// Desired or persisted configuration of a single interface.
///
/// Two values are equal when the host needs no change to go from one to the
/// other, hence the derived `PartialEq` is the equality rule used for
/// diffing.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct InterfaceSpec {
    pub name: String,
    pub enabled: bool,
    pub proto: InterfaceProto,
    #[serde(rename = "type")]
    pub iface_type: InterfaceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipaddr: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}

impl InterfaceSpec {
    pub fn new(
        name: &str,
        enabled: bool,
        proto: InterfaceProto,
        iface_type: InterfaceType,
    ) -> Self {
        Self {
            name: name.to_string(),
            enabled,
            proto,
            iface_type,
            ipaddr: None,
            netmask: None,
            gateway: None,
            mtu: None,
        }
    }

    /// Parent interface of a VLAN named `<parent>.<vlan_id>`.
    pub fn vlan_parent(&self) -> Option<&str> {
        if self.iface_type == InterfaceType::Vlan {
            self.name.rsplit_once('.').map(|(parent, _)| parent)
        } else {
            None
        }
    }

    /// VLAN ID of a VLAN named `<parent>.<vlan_id>`.
    pub fn vlan_id(&self) -> Option<u16> {
        if self.iface_type == InterfaceType::Vlan {
            self.name
                .rsplit_once('.')
                .and_then(|(_, id)| id.parse::<u16>().ok())
        } else {
            None
        }
    }
}
