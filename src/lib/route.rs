// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Static route entry
pub struct RouteEntry {
    /// Free-form label, not persisted by any dialect and ignored when
    /// comparing route sets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Destination network address
    pub ipaddr: Ipv4Addr,
    /// Destination network mask
    pub netmask: Ipv4Addr,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Next hop address
    pub gateway: Option<Ipv4Addr>,
}

impl RouteEntry {
    pub fn new(
        ipaddr: Ipv4Addr,
        netmask: Ipv4Addr,
        gateway: Option<Ipv4Addr>,
    ) -> Self {
        Self {
            name: None,
            ipaddr,
            netmask,
            gateway,
        }
    }

    pub(crate) fn sort_key(&self) -> (Ipv4Addr, Ipv4Addr, Option<Ipv4Addr>) {
        (self.ipaddr, self.netmask, self.gateway)
    }

    /// Human readable form used in change descriptions.
    pub fn describe(&self) -> String {
        match self.gateway {
            Some(gw) => format!("{}/{} via {gw}", self.ipaddr, self.netmask),
            None => format!("{}/{}", self.ipaddr, self.netmask),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
/// Desired route set of an interface
pub enum DesiredRoutes {
    /// Routes not mentioned at all, persisted routes are left untouched.
    #[default]
    Unspecified,
    /// Explicitly empty route set.
    NoRoutes,
    /// Non-empty route set.
    Routes(Vec<RouteEntry>),
}

impl DesiredRoutes {
    pub fn entries(&self) -> &[RouteEntry] {
        match self {
            Self::Routes(rts) => rts.as_slice(),
            Self::Unspecified | Self::NoRoutes => &[],
        }
    }
}

impl From<Vec<RouteEntry>> for DesiredRoutes {
    fn from(routes: Vec<RouteEntry>) -> Self {
        if routes.is_empty() {
            Self::NoRoutes
        } else {
            Self::Routes(routes)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RouteSpec {
    /// Interface the route set belongs to.
    pub name: String,
    pub routes: DesiredRoutes,
}

impl RouteSpec {
    pub fn new(name: &str, routes: DesiredRoutes) -> Self {
        Self {
            name: name.to_string(),
            routes,
        }
    }
}

/// Whether two route sets hold the same routes regardless of order and
/// labels.
pub(crate) fn is_same_route_set(a: &[RouteEntry], b: &[RouteEntry]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a_keys: Vec<_> = a.iter().map(RouteEntry::sort_key).collect();
    let mut b_keys: Vec<_> = b.iter().map(RouteEntry::sort_key).collect();
    a_keys.sort_unstable();
    b_keys.sort_unstable();
    a_keys == b_keys
}
