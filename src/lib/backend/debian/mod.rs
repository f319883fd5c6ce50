// SPDX-License-Identifier: Apache-2.0

mod interfaces;
mod routes;

use std::net::Ipv4Addr;
use std::path::PathBuf;

use self::interfaces::{IfaceStanza, InterfacesFile, FAMILY_INET};
use super::key_value::{parse_yes_no, yes_no, KeyValueFile};
use super::persist::{read_optional, write_atomic};
use super::parse_ipv4;
use crate::{
    ActualGlobalSettings, ActualInterfaceState, ActualRoutes, ErrorKind,
    GlobalNetworkSpec, InterfaceProto, InterfaceSpec, InterfaceType,
    NetconvConfig, NetconvError, OsFamily, RouteEntry, LOOPBACK_IFACE_NAME,
};

const OPT_ADDRESS: &str = "address";
const OPT_NETMASK: &str = "netmask";
const OPT_GATEWAY: &str = "gateway";
const OPT_MTU: &str = "mtu";
const OPT_BOND_SLAVES: &str = "bond-slaves";
const OPT_BRIDGE_PORTS: &str = "bridge_ports";
const OPT_VLAN_RAW_DEVICE: &str = "vlan-raw-device";

const MANAGED_OPTIONS: [&str; 7] = [
    OPT_ADDRESS,
    OPT_NETMASK,
    OPT_GATEWAY,
    OPT_MTU,
    OPT_BOND_SLAVES,
    OPT_BRIDGE_PORTS,
    OPT_VLAN_RAW_DEVICE,
];

const KEY_CONFIGURE_INTERFACES: &str = "CONFIGURE_INTERFACES";

/// Debian `ifupdown` dialect: one shared interfaces file, route scripts in
/// `if-up.d`/`if-down.d` and `/etc/default/networking`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DebianBackend {
    interfaces_file: PathBuf,
    if_up_dir: PathBuf,
    if_down_dir: PathBuf,
    networking_defaults: PathBuf,
    hostname_file: PathBuf,
}

impl DebianBackend {
    pub(crate) fn new(config: &NetconvConfig) -> Self {
        Self {
            interfaces_file: config.rooted(&config.debian.interfaces_file),
            if_up_dir: config.rooted(&config.debian.if_up_dir),
            if_down_dir: config.rooted(&config.debian.if_down_dir),
            networking_defaults: config
                .rooted(&config.debian.networking_defaults),
            hostname_file: config.rooted(&config.debian.hostname_file),
        }
    }

    fn load_interfaces_file(&self) -> Result<InterfacesFile, NetconvError> {
        match read_optional(&self.interfaces_file)? {
            Some(content) => InterfacesFile::parse(&content).map_err(|e| {
                NetconvError::new(
                    e.kind(),
                    format!("{}: {}", self.interfaces_file.display(), e.msg()),
                )
            }),
            None => Ok(InterfacesFile::default()),
        }
    }

    pub(crate) fn read_interface(
        &self,
        name: &str,
    ) -> Result<ActualInterfaceState, NetconvError> {
        let file = self.load_interfaces_file()?;
        match file.stanza(name, FAMILY_INET) {
            Some(stanza) => Ok(ActualInterfaceState::Present(
                spec_from_stanza(stanza, file.is_auto(name))?,
            )),
            None => Ok(ActualInterfaceState::Absent),
        }
    }

    pub(crate) fn write_interface(
        &self,
        spec: &InterfaceSpec,
    ) -> Result<(), NetconvError> {
        let mut file = self.load_interfaces_file()?;
        let stanza = stanza_from_spec(spec, file.stanza(&spec.name, FAMILY_INET));
        file.set_stanza(stanza, spec.enabled);
        write_atomic(&self.interfaces_file, &file.to_content(), None)
    }

    /// run-parts only executes files named with `[A-Za-z0-9_-]`, so other
    /// characters, like the `.` of VLANs or the `:` of aliases, become `_`.
    /// The script itself still matches the real interface name.
    fn route_script_paths(&self, name: &str) -> (PathBuf, PathBuf) {
        let file_name: String = format!("route-{name}")
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        (
            self.if_up_dir.join(&file_name),
            self.if_down_dir.join(&file_name),
        )
    }

    pub(crate) fn read_routes(
        &self,
        name: &str,
    ) -> Result<ActualRoutes, NetconvError> {
        let (up_path, _) = self.route_script_paths(name);
        match read_optional(&up_path)? {
            Some(content) => routes::parse_route_script(&content)
                .map(ActualRoutes::Present)
                .map_err(|e| {
                    NetconvError::new(
                        e.kind(),
                        format!("{}: {}", up_path.display(), e.msg()),
                    )
                }),
            None => Ok(ActualRoutes::Absent),
        }
    }

    pub(crate) fn write_routes(
        &self,
        name: &str,
        routes: &[RouteEntry],
    ) -> Result<(), NetconvError> {
        let (up_path, down_path) = self.route_script_paths(name);
        write_atomic(
            &up_path,
            &routes::gen_route_script(name, routes, routes::RouteAction::Add),
            Some(0o755),
        )?;
        write_atomic(
            &down_path,
            &routes::gen_route_script(name, routes, routes::RouteAction::Del),
            Some(0o755),
        )
    }

    pub(crate) fn read_global_settings(
        &self,
    ) -> Result<ActualGlobalSettings, NetconvError> {
        let Some(content) = read_optional(&self.networking_defaults)? else {
            return Ok(ActualGlobalSettings::Absent);
        };
        let defaults = KeyValueFile::parse(&content);
        let enabled = match defaults.get(KEY_CONFIGURE_INTERFACES) {
            Some(value) => parse_yes_no(value).ok_or_else(|| {
                NetconvError::new(
                    ErrorKind::ReadError,
                    format!(
                        "{}: invalid {KEY_CONFIGURE_INTERFACES} value \
                         {value:?}",
                        self.networking_defaults.display()
                    ),
                )
            })?,
            // ifupdown configures interfaces unless told otherwise
            None => true,
        };
        let hostname = read_optional(&self.hostname_file)?
            .map(|h| h.trim().to_string())
            .unwrap_or_default();
        Ok(ActualGlobalSettings::Present(GlobalNetworkSpec {
            enabled,
            hostname,
        }))
    }

    pub(crate) fn write_global_settings(
        &self,
        spec: &GlobalNetworkSpec,
    ) -> Result<(), NetconvError> {
        let mut defaults = match read_optional(&self.networking_defaults)? {
            Some(content) => KeyValueFile::parse(&content),
            None => KeyValueFile::default(),
        };
        defaults.set(KEY_CONFIGURE_INTERFACES, Some(yes_no(spec.enabled)));
        write_atomic(&self.networking_defaults, &defaults.to_content(), None)?;
        write_atomic(&self.hostname_file, &format!("{}\n", spec.hostname), None)
    }
}

fn stanza_from_spec(
    spec: &InterfaceSpec,
    existing: Option<&IfaceStanza>,
) -> IfaceStanza {
    let mut stanza = IfaceStanza::new(&spec.name, spec.proto.as_str());
    if let Some(addr) = spec.ipaddr {
        stanza.push_option(OPT_ADDRESS, &addr.to_string());
    }
    if let Some(netmask) = spec.netmask {
        stanza.push_option(OPT_NETMASK, &netmask.to_string());
    }
    if let Some(gateway) = spec.gateway {
        stanza.push_option(OPT_GATEWAY, &gateway.to_string());
    }
    if let Some(mtu) = spec.mtu {
        stanza.push_option(OPT_MTU, &mtu.to_string());
    }
    let existing_opt =
        |key: &str| existing.and_then(|s| s.option(key)).unwrap_or("none");
    match spec.iface_type {
        InterfaceType::Bond => {
            stanza.push_option(OPT_BOND_SLAVES, existing_opt(OPT_BOND_SLAVES))
        }
        InterfaceType::Bridge => stanza
            .push_option(OPT_BRIDGE_PORTS, existing_opt(OPT_BRIDGE_PORTS)),
        InterfaceType::Vlan => {
            if let Some(parent) = spec.vlan_parent() {
                stanza.push_option(OPT_VLAN_RAW_DEVICE, parent);
            }
        }
        _ => (),
    }
    if let Some(existing) = existing {
        let kept: Vec<String> =
            existing.unmanaged_options(&MANAGED_OPTIONS).cloned().collect();
        stanza.options.extend(kept);
    }
    stanza
}

fn spec_from_stanza(
    stanza: &IfaceStanza,
    auto: bool,
) -> Result<InterfaceSpec, NetconvError> {
    let proto = InterfaceProto::from_name(&stanza.method)
        .filter(|p| OsFamily::Debian.supported_protos().contains(p))
        .ok_or_else(|| {
            NetconvError::new(
                ErrorKind::ReadError,
                format!(
                    "Unsupported method `{}` in stanza of interface {}",
                    stanza.method, stanza.name
                ),
            )
        })?;

    let iface_type = if stanza.name == LOOPBACK_IFACE_NAME {
        InterfaceType::Loopback
    } else if stanza.has_option(OPT_BOND_SLAVES) {
        InterfaceType::Bond
    } else if stanza.has_option(OPT_BRIDGE_PORTS) {
        InterfaceType::Bridge
    } else if stanza.has_option(OPT_VLAN_RAW_DEVICE) {
        InterfaceType::Vlan
    } else if stanza.name.contains(':') {
        InterfaceType::Alias
    } else {
        InterfaceType::Eth
    };

    let mut spec = InterfaceSpec::new(&stanza.name, auto, proto, iface_type);
    if let Some(address) = stanza.option(OPT_ADDRESS) {
        let (addr, netmask) = parse_address(address)?;
        spec.ipaddr = Some(addr);
        spec.netmask = netmask;
    }
    if let Some(netmask) = stanza.option(OPT_NETMASK) {
        spec.netmask = Some(parse_ipv4(netmask, ErrorKind::ReadError)?);
    }
    if let Some(gateway) = stanza.option(OPT_GATEWAY) {
        spec.gateway = Some(parse_ipv4(gateway, ErrorKind::ReadError)?);
    }
    if let Some(mtu) = stanza.option(OPT_MTU) {
        spec.mtu = Some(mtu.parse::<u32>().map_err(|e| {
            NetconvError::new(
                ErrorKind::ReadError,
                format!("Invalid mtu {mtu:?} of interface {}: {e}", spec.name),
            )
        })?);
    }
    Ok(spec)
}

/// Parse `address` option which might carry a prefix length.
fn parse_address(
    address: &str,
) -> Result<(Ipv4Addr, Option<Ipv4Addr>), NetconvError> {
    match address.split_once('/') {
        Some((addr, mask)) => Ok((
            parse_ipv4(addr, ErrorKind::ReadError)?,
            Some(super::parse_netmask(mask, ErrorKind::ReadError)?),
        )),
        None => Ok((parse_ipv4(address, ErrorKind::ReadError)?, None)),
    }
}
