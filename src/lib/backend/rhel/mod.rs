// SPDX-License-Identifier: Apache-2.0

mod routes;

use std::path::PathBuf;

use super::key_value::{parse_yes_no, yes_no, KeyValueFile};
use super::persist::{read_optional, remove_if_exists, write_atomic};
use super::parse_ipv4;
use crate::{
    ActualGlobalSettings, ActualInterfaceState, ActualRoutes, ErrorKind,
    GlobalNetworkSpec, InterfaceProto, InterfaceSpec, InterfaceType,
    NetconvConfig, NetconvError, OsFamily, RouteEntry,
};

const KEY_DEVICE: &str = "DEVICE";
const KEY_TYPE: &str = "TYPE";
const KEY_ONBOOT: &str = "ONBOOT";
const KEY_BOOTPROTO: &str = "BOOTPROTO";
const KEY_IPADDR: &str = "IPADDR";
const KEY_NETMASK: &str = "NETMASK";
const KEY_GATEWAY: &str = "GATEWAY";
const KEY_MTU: &str = "MTU";
const KEY_VLAN: &str = "VLAN";
const KEY_PHYSDEV: &str = "PHYSDEV";

const KEY_NETWORKING: &str = "NETWORKING";
const KEY_HOSTNAME: &str = "HOSTNAME";

/// RHEL `network-scripts` dialect: one `ifcfg-<name>` and `route-<name>`
/// file per interface plus `/etc/sysconfig/network`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RhelBackend {
    network_scripts_dir: PathBuf,
    network_file: PathBuf,
}

impl RhelBackend {
    pub(crate) fn new(config: &NetconvConfig) -> Self {
        Self {
            network_scripts_dir: config
                .rooted(&config.rhel.network_scripts_dir),
            network_file: config.rooted(&config.rhel.network_file),
        }
    }

    fn ifcfg_path(&self, name: &str) -> PathBuf {
        self.network_scripts_dir.join(format!("ifcfg-{name}"))
    }

    fn route_path(&self, name: &str) -> PathBuf {
        self.network_scripts_dir.join(format!("route-{name}"))
    }

    pub(crate) fn read_interface(
        &self,
        name: &str,
    ) -> Result<ActualInterfaceState, NetconvError> {
        let path = self.ifcfg_path(name);
        match read_optional(&path)? {
            Some(content) => spec_from_ifcfg(name, &KeyValueFile::parse(&content))
                .map(ActualInterfaceState::Present)
                .map_err(|e| {
                    NetconvError::new(
                        e.kind(),
                        format!("{}: {}", path.display(), e.msg()),
                    )
                }),
            None => Ok(ActualInterfaceState::Absent),
        }
    }

    pub(crate) fn write_interface(
        &self,
        spec: &InterfaceSpec,
    ) -> Result<(), NetconvError> {
        let path = self.ifcfg_path(&spec.name);
        let mut ifcfg = match read_optional(&path)? {
            Some(content) => KeyValueFile::parse(&content),
            None => KeyValueFile::default(),
        };
        update_ifcfg(&mut ifcfg, spec);
        write_atomic(&path, &ifcfg.to_content(), None)
    }

    pub(crate) fn read_routes(
        &self,
        name: &str,
    ) -> Result<ActualRoutes, NetconvError> {
        let path = self.route_path(name);
        match read_optional(&path)? {
            Some(content) => routes::parse_route_file(&content)
                .map(ActualRoutes::Present)
                .map_err(|e| {
                    NetconvError::new(
                        e.kind(),
                        format!("{}: {}", path.display(), e.msg()),
                    )
                }),
            None => Ok(ActualRoutes::Absent),
        }
    }

    /// Empty route set is stored as no route file at all.
    pub(crate) fn write_routes(
        &self,
        name: &str,
        routes: &[RouteEntry],
    ) -> Result<(), NetconvError> {
        let path = self.route_path(name);
        if routes.is_empty() {
            remove_if_exists(&path)
        } else {
            write_atomic(&path, &routes::gen_route_file(routes), None)
        }
    }

    pub(crate) fn read_global_settings(
        &self,
    ) -> Result<ActualGlobalSettings, NetconvError> {
        let Some(content) = read_optional(&self.network_file)? else {
            return Ok(ActualGlobalSettings::Absent);
        };
        let network = KeyValueFile::parse(&content);
        let enabled = match network.get(KEY_NETWORKING) {
            Some(value) => parse_yes_no(value).ok_or_else(|| {
                NetconvError::new(
                    ErrorKind::ReadError,
                    format!(
                        "{}: invalid {KEY_NETWORKING} value {value:?}",
                        self.network_file.display()
                    ),
                )
            })?,
            None => false,
        };
        Ok(ActualGlobalSettings::Present(GlobalNetworkSpec {
            enabled,
            hostname: network.get(KEY_HOSTNAME).unwrap_or_default().to_string(),
        }))
    }

    pub(crate) fn write_global_settings(
        &self,
        spec: &GlobalNetworkSpec,
    ) -> Result<(), NetconvError> {
        let mut network = match read_optional(&self.network_file)? {
            Some(content) => KeyValueFile::parse(&content),
            None => KeyValueFile::default(),
        };
        network.set(KEY_NETWORKING, Some(yes_no(spec.enabled)));
        network.set(KEY_HOSTNAME, Some(spec.hostname.as_str()));
        write_atomic(&self.network_file, &network.to_content(), None)
    }
}

fn type_to_ifcfg(iface_type: InterfaceType) -> &'static str {
    match iface_type {
        InterfaceType::Loopback => "Loopback",
        InterfaceType::Bond => "Bond",
        InterfaceType::Vlan => "Vlan",
        InterfaceType::Bridge => "Bridge",
        // Aliases are told apart by the `:` in the device name
        _ => "Ethernet",
    }
}

fn update_ifcfg(ifcfg: &mut KeyValueFile, spec: &InterfaceSpec) {
    let ipaddr = spec.ipaddr.map(|a| a.to_string());
    let netmask = spec.netmask.map(|a| a.to_string());
    let gateway = spec.gateway.map(|a| a.to_string());
    let mtu = spec.mtu.map(|m| m.to_string());
    let is_vlan = spec.iface_type == InterfaceType::Vlan;

    ifcfg.set(KEY_DEVICE, Some(spec.name.as_str()));
    ifcfg.set(KEY_TYPE, Some(type_to_ifcfg(spec.iface_type)));
    ifcfg.set(KEY_ONBOOT, Some(yes_no(spec.enabled)));
    ifcfg.set(KEY_BOOTPROTO, Some(spec.proto.as_str()));
    ifcfg.set(KEY_IPADDR, ipaddr.as_deref());
    ifcfg.set(KEY_NETMASK, netmask.as_deref());
    ifcfg.set(KEY_GATEWAY, gateway.as_deref());
    ifcfg.set(KEY_MTU, mtu.as_deref());
    ifcfg.set(KEY_VLAN, is_vlan.then_some("yes"));
    ifcfg.set(KEY_PHYSDEV, spec.vlan_parent());
}

fn spec_from_ifcfg(
    name: &str,
    ifcfg: &KeyValueFile,
) -> Result<InterfaceSpec, NetconvError> {
    let name = ifcfg.get(KEY_DEVICE).unwrap_or(name);
    let enabled = match ifcfg.get(KEY_ONBOOT) {
        Some(value) => parse_yes_no(value).ok_or_else(|| {
            NetconvError::new(
                ErrorKind::ReadError,
                format!("Invalid {KEY_ONBOOT} value {value:?}"),
            )
        })?,
        None => false,
    };

    let proto = match ifcfg.get(KEY_BOOTPROTO) {
        // `BOOTPROTO` defaults to none when omitted
        None | Some("") => InterfaceProto::None,
        Some(value) => InterfaceProto::from_name(&value.to_ascii_lowercase())
            .filter(|p| OsFamily::Rhel.supported_protos().contains(p))
            .ok_or_else(|| {
                NetconvError::new(
                    ErrorKind::ReadError,
                    format!("Unsupported {KEY_BOOTPROTO} value {value:?}"),
                )
            })?,
    };

    let iface_type = if name.contains(':') {
        InterfaceType::Alias
    } else {
        match ifcfg.get(KEY_TYPE) {
            None | Some("") => {
                if ifcfg.get(KEY_VLAN).and_then(parse_yes_no) == Some(true) {
                    InterfaceType::Vlan
                } else {
                    InterfaceType::Eth
                }
            }
            Some("Ethernet") => InterfaceType::Eth,
            Some("Loopback") => InterfaceType::Loopback,
            Some("Bond") => InterfaceType::Bond,
            Some("Vlan") => InterfaceType::Vlan,
            Some("Bridge") => InterfaceType::Bridge,
            Some(value) => {
                return Err(NetconvError::new(
                    ErrorKind::ReadError,
                    format!("Unsupported {KEY_TYPE} value {value:?}"),
                ));
            }
        }
    };

    let mut spec = InterfaceSpec::new(name, enabled, proto, iface_type);
    if let Some(v) = ifcfg.get(KEY_IPADDR) {
        spec.ipaddr = Some(parse_ipv4(v, ErrorKind::ReadError)?);
    }
    if let Some(v) = ifcfg.get(KEY_NETMASK) {
        spec.netmask = Some(parse_ipv4(v, ErrorKind::ReadError)?);
    }
    if let Some(v) = ifcfg.get(KEY_GATEWAY) {
        spec.gateway = Some(parse_ipv4(v, ErrorKind::ReadError)?);
    }
    if let Some(v) = ifcfg.get(KEY_MTU) {
        spec.mtu = Some(v.parse::<u32>().map_err(|e| {
            NetconvError::new(
                ErrorKind::ReadError,
                format!("Invalid {KEY_MTU} value {v:?}: {e}"),
            )
        })?);
    }
    Ok(spec)
}
