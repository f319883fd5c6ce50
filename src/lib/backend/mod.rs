// SPDX-License-Identifier: Apache-2.0

mod debian;
mod key_value;
mod persist;
mod rhel;

use std::net::Ipv4Addr;

use self::debian::DebianBackend;
use self::rhel::RhelBackend;
use crate::{
    ActualGlobalSettings, ActualInterfaceState, ActualRoutes, ErrorKind,
    GlobalNetworkSpec, HostExec, InterfaceSpec, NetconvConfig, NetconvError,
    OsFamily, RouteEntry,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dialect {
    Debian(DebianBackend),
    Rhel(RhelBackend),
}

/// Reads and writes the persisted network configuration of one OS dialect
/// and drives the OS commands bringing interfaces up or down.
#[derive(Debug)]
pub struct NetBackend {
    dialect: Dialect,
    exec: HostExec,
}

impl NetBackend {
    pub fn new(
        config: &NetconvConfig,
        exec: HostExec,
    ) -> Result<Self, NetconvError> {
        let dialect = match config.os_family()? {
            OsFamily::Debian => Dialect::Debian(DebianBackend::new(config)),
            OsFamily::Rhel => Dialect::Rhel(RhelBackend::new(config)),
        };
        Ok(Self { dialect, exec })
    }

    pub fn os_family(&self) -> OsFamily {
        match &self.dialect {
            Dialect::Debian(_) => OsFamily::Debian,
            Dialect::Rhel(_) => OsFamily::Rhel,
        }
    }

    /// Persisted configuration of interface, tolerating missing file or
    /// stanza.
    pub fn read_interface(
        &self,
        name: &str,
    ) -> Result<ActualInterfaceState, NetconvError> {
        match &self.dialect {
            Dialect::Debian(b) => b.read_interface(name),
            Dialect::Rhel(b) => b.read_interface(name),
        }
    }

    pub fn read_routes(&self, name: &str) -> Result<ActualRoutes, NetconvError> {
        match &self.dialect {
            Dialect::Debian(b) => b.read_routes(name),
            Dialect::Rhel(b) => b.read_routes(name),
        }
    }

    pub fn read_global_settings(
        &self,
    ) -> Result<ActualGlobalSettings, NetconvError> {
        match &self.dialect {
            Dialect::Debian(b) => b.read_global_settings(),
            Dialect::Rhel(b) => b.read_global_settings(),
        }
    }

    /// Persist interface configuration. Writing the same spec twice
    /// produces identical files. Kernel modules required by the interface
    /// type are loaded first.
    pub fn write_interface(
        &self,
        spec: &InterfaceSpec,
    ) -> Result<(), NetconvError> {
        if let Some(module) = spec.iface_type.kernel_module() {
            self.exec.ensure_module(module)?;
        }
        log::info!("Writing configuration of interface {}", spec.name);
        match &self.dialect {
            Dialect::Debian(b) => b.write_interface(spec),
            Dialect::Rhel(b) => b.write_interface(spec),
        }
    }

    pub fn write_routes(
        &self,
        name: &str,
        routes: &[RouteEntry],
    ) -> Result<(), NetconvError> {
        log::info!("Writing {} routes of interface {name}", routes.len());
        match &self.dialect {
            Dialect::Debian(b) => b.write_routes(name, routes),
            Dialect::Rhel(b) => b.write_routes(name, routes),
        }
    }

    /// Persist global settings and apply the hostname to the running
    /// system when `hostname_changed`.
    pub fn write_global_settings(
        &self,
        spec: &GlobalNetworkSpec,
        hostname_changed: bool,
    ) -> Result<(), NetconvError> {
        log::info!("Writing global network settings {spec}");
        match &self.dialect {
            Dialect::Debian(b) => b.write_global_settings(spec)?,
            Dialect::Rhel(b) => b.write_global_settings(spec)?,
        }
        if hostname_changed {
            self.exec.set_hostname(&spec.hostname)?;
        }
        Ok(())
    }

    /// Bring interface up, down or restart it, returning a human readable
    /// description of what happened.
    pub fn apply_interface_state(
        &self,
        name: &str,
        desired_enabled: bool,
        needs_restart: bool,
    ) -> Result<String, NetconvError> {
        if !desired_enabled {
            log::info!("Bringing interface {name} down");
            self.exec.ifdown(name)?;
            Ok(format!("Interface {name} down"))
        } else if needs_restart {
            log::info!("Restarting interface {name}");
            self.exec.ifdown(name)?;
            self.exec.ifup(name)?;
            Ok(format!("Interface {name} restart to validate"))
        } else {
            log::info!("Bringing interface {name} up");
            self.exec.ifup(name)?;
            Ok(format!("Interface {name} is up"))
        }
    }
}

pub(crate) fn parse_ipv4(
    value: &str,
    kind: ErrorKind,
) -> Result<Ipv4Addr, NetconvError> {
    value.trim().parse::<Ipv4Addr>().map_err(|e| {
        NetconvError::new(kind, format!("Invalid IPv4 address {value:?}: {e}"))
    })
}

/// Parse netmask in either dotted or prefix length form.
pub(crate) fn parse_netmask(
    value: &str,
    kind: ErrorKind,
) -> Result<Ipv4Addr, NetconvError> {
    if let Ok(prefix) = value.trim().parse::<u8>() {
        if prefix > 32 {
            return Err(NetconvError::new(
                kind,
                format!("Invalid prefix length {prefix}"),
            ));
        }
        let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
        Ok(Ipv4Addr::from(mask))
    } else {
        parse_ipv4(value, kind)
    }
}
