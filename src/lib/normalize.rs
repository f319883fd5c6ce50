// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::{
    DesiredRoutes, ErrorKind, GlobalNetworkSpec, InterfaceProto,
    InterfaceSpec, InterfaceType, NetconvError, OsFamily, RouteEntry,
    RouteSpec, LOOPBACK_IFACE_NAME,
};

/// Desired interface as written by user, validated by
/// [RawInterface::normalize].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct RawInterface {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub proto: Option<String>,
    #[serde(rename = "type")]
    pub iface_type: Option<String>,
    pub ipaddr: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
    pub mtu: Option<u32>,
}

impl RawInterface {
    pub fn new(name: &str, iface_type: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            iface_type: Some(iface_type.to_string()),
            ..Default::default()
        }
    }

    /// Validate against the dialect and fill defaults: `enabled` defaults
    /// to true and `proto` to the dialect's "no protocol" method.
    pub fn normalize(
        self,
        os_family: OsFamily,
    ) -> Result<InterfaceSpec, NetconvError> {
        let name = required("name", self.name)?;
        validate_iface_name(&name)?;

        let iface_type_str = required("type", self.iface_type)?;
        let iface_type = InterfaceType::from_name(&iface_type_str)
            .filter(|t| os_family.supported_types().contains(t))
            .ok_or_else(|| {
                NetconvError::invalid_spec(format!(
                    "Unsupported interface type {iface_type_str:?} for \
                     {os_family}, supported: {}",
                    os_family
                        .supported_types()
                        .iter()
                        .map(InterfaceType::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        let proto = match self.proto {
            Some(proto_str) => InterfaceProto::from_name(&proto_str)
                .filter(|p| os_family.supported_protos().contains(p))
                .ok_or_else(|| {
                    NetconvError::invalid_spec(format!(
                        "Unsupported proto {proto_str:?} for {os_family}, \
                         supported: {}",
                        os_family
                            .supported_protos()
                            .iter()
                            .map(InterfaceProto::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?,
            None => os_family.no_proto(),
        };

        let mut spec = InterfaceSpec::new(
            &name,
            self.enabled.unwrap_or(true),
            proto,
            iface_type,
        );
        spec.ipaddr = optional_ipv4("ipaddr", self.ipaddr.as_deref())?;
        spec.netmask = optional_ipv4("netmask", self.netmask.as_deref())?;
        spec.gateway = optional_ipv4("gateway", self.gateway.as_deref())?;
        spec.mtu = self.mtu;

        validate_iface_spec(&spec)?;
        log::debug!("Normalized interface {spec}");
        Ok(spec)
    }
}

fn validate_iface_name(name: &str) -> Result<(), NetconvError> {
    // Kernel limit IFNAMSIZ including trailing NUL
    if name.is_empty()
        || name.len() > 15
        || name.contains(|c: char| c.is_whitespace() || c == '/')
    {
        return Err(NetconvError::invalid_spec(format!(
            "Invalid interface name {name:?}"
        )));
    }
    Ok(())
}

fn validate_iface_spec(spec: &InterfaceSpec) -> Result<(), NetconvError> {
    let is_lo = spec.name == LOOPBACK_IFACE_NAME;
    if is_lo != (spec.iface_type == InterfaceType::Loopback) {
        return Err(NetconvError::invalid_spec(format!(
            "Interface type loopback is only valid for interface \
             {LOOPBACK_IFACE_NAME}, got interface {} with type {}",
            spec.name, spec.iface_type
        )));
    }
    let has_colon = spec.name.contains(':');
    if has_colon != (spec.iface_type == InterfaceType::Alias) {
        return Err(NetconvError::invalid_spec(format!(
            "Interface type alias requires name in the form of \
             <parent>:<label>, got interface {} with type {}",
            spec.name, spec.iface_type
        )));
    }
    if spec.iface_type == InterfaceType::Vlan && spec.vlan_id().is_none() {
        return Err(NetconvError::invalid_spec(format!(
            "VLAN interface {} should be named as <parent>.<vlan_id>",
            spec.name
        )));
    }
    if spec.proto == InterfaceProto::Static && spec.ipaddr.is_none() {
        return Err(NetconvError::invalid_spec(format!(
            "Interface {} with static proto requires ipaddr",
            spec.name
        )));
    }
    if spec.mtu == Some(0) {
        return Err(NetconvError::invalid_spec(format!(
            "Invalid mtu 0 for interface {}",
            spec.name
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct RawRouteEntry {
    pub name: Option<String>,
    pub ipaddr: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct RawRoutes {
    pub name: Option<String>,
    /// `None` when routes are not mentioned at all, which is different
    /// from an explicit empty list.
    pub routes: Option<Vec<RawRouteEntry>>,
}

impl RawRoutes {
    pub fn normalize(self) -> Result<RouteSpec, NetconvError> {
        let name = required("name", self.name)?;
        // Route files are named after the interface
        validate_iface_name(&name)?;
        let routes = match self.routes {
            None => DesiredRoutes::Unspecified,
            Some(raw_routes) => {
                let mut routes = Vec::new();
                for raw in raw_routes {
                    routes.push(normalize_route(raw)?);
                }
                DesiredRoutes::from(routes)
            }
        };
        Ok(RouteSpec::new(&name, routes))
    }
}

fn normalize_route(raw: RawRouteEntry) -> Result<RouteEntry, NetconvError> {
    let ipaddr_str = required("route ipaddr", raw.ipaddr)?;
    let netmask_str = required("route netmask", raw.netmask)?;
    let mut route = RouteEntry::new(
        crate::backend::parse_ipv4(&ipaddr_str, ErrorKind::InvalidSpec)?,
        crate::backend::parse_netmask(&netmask_str, ErrorKind::InvalidSpec)?,
        optional_ipv4("route gateway", raw.gateway.as_deref())?,
    );
    route.name = raw.name;
    Ok(route)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct RawGlobalSettings {
    pub enabled: Option<bool>,
    pub hostname: Option<String>,
}

impl RawGlobalSettings {
    /// Fill defaults: `enabled` is true and `hostname` is the live hostname
    /// of this machine.
    pub fn normalize(self) -> Result<GlobalNetworkSpec, NetconvError> {
        let hostname = match self.hostname {
            Some(h) => h.trim().to_string(),
            None => current_hostname()?,
        };
        if hostname.is_empty()
            || hostname.len() > 253
            || hostname.contains(char::is_whitespace)
        {
            return Err(NetconvError::invalid_spec(format!(
                "Invalid hostname {hostname:?}"
            )));
        }
        Ok(GlobalNetworkSpec::new(self.enabled.unwrap_or(true), &hostname))
    }
}

/// Hostname of the running system.
pub fn current_hostname() -> Result<String, NetconvError> {
    let hostname = nix::unistd::gethostname().map_err(|e| {
        NetconvError::new(
            ErrorKind::ReadError,
            format!("Failed to query hostname: {e}"),
        )
    })?;
    Ok(hostname.to_string_lossy().to_string())
}

fn required(field: &str, value: Option<String>) -> Result<String, NetconvError> {
    value.ok_or_else(|| {
        NetconvError::invalid_spec(format!("Missing required field {field}"))
    })
}

fn optional_ipv4(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Ipv4Addr>, NetconvError> {
    value
        .map(|v| {
            v.trim().parse::<Ipv4Addr>().map_err(|e| {
                NetconvError::invalid_spec(format!(
                    "Invalid {field} {v:?}: {e}"
                ))
            })
        })
        .transpose()
}
