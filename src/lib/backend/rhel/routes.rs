// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::backend::key_value::KeyValueFile;
use crate::backend::parse_ipv4;
use crate::{ErrorKind, NetconvError, RouteEntry};

const PREFIX_ADDRESS: &str = "ADDRESS";
const PREFIX_NETMASK: &str = "NETMASK";
const PREFIX_GATEWAY: &str = "GATEWAY";

/// Generate `route-<name>` holding `ADDRESS<n>`, `NETMASK<n>` and
/// `GATEWAY<n>` entries.
pub(crate) fn gen_route_file(routes: &[RouteEntry]) -> String {
    let mut file = KeyValueFile::default();
    for (index, route) in routes.iter().enumerate() {
        file.set(
            &format!("{PREFIX_ADDRESS}{index}"),
            Some(&route.ipaddr.to_string()),
        );
        file.set(
            &format!("{PREFIX_NETMASK}{index}"),
            Some(&route.netmask.to_string()),
        );
        if let Some(gw) = route.gateway {
            file.set(&format!("{PREFIX_GATEWAY}{index}"), Some(&gw.to_string()));
        }
    }
    file.to_content()
}

#[derive(Default)]
struct PartialRoute {
    ipaddr: Option<Ipv4Addr>,
    netmask: Option<Ipv4Addr>,
    gateway: Option<Ipv4Addr>,
}

/// Parse `route-<name>`, routes are ordered by their index suffix.
pub(crate) fn parse_route_file(
    content: &str,
) -> Result<Vec<RouteEntry>, NetconvError> {
    let file = KeyValueFile::parse(content);
    let mut partials: BTreeMap<u32, PartialRoute> = BTreeMap::new();

    for key in file.keys() {
        let Some((prefix, index)) = split_indexed_key(key) else {
            log::debug!("Ignoring unknown key {key} in route file");
            continue;
        };
        let Some(value) = file.get(key) else {
            continue;
        };
        let value = parse_ipv4(value, ErrorKind::ReadError)?;
        let partial = partials.entry(index).or_default();
        match prefix {
            PREFIX_ADDRESS => partial.ipaddr = Some(value),
            PREFIX_NETMASK => partial.netmask = Some(value),
            _ => partial.gateway = Some(value),
        }
    }

    partials
        .into_iter()
        .map(|(index, partial)| match partial {
            PartialRoute {
                ipaddr: Some(ipaddr),
                netmask,
                gateway,
            } => Ok(RouteEntry::new(
                ipaddr,
                netmask.unwrap_or(Ipv4Addr::BROADCAST),
                gateway,
            )),
            _ => Err(NetconvError::new(
                ErrorKind::ReadError,
                format!("Route {index} has no {PREFIX_ADDRESS}{index}"),
            )),
        })
        .collect()
}

fn split_indexed_key(key: &str) -> Option<(&'static str, u32)> {
    [PREFIX_ADDRESS, PREFIX_NETMASK, PREFIX_GATEWAY]
        .into_iter()
        .find_map(|prefix| {
            key.strip_prefix(prefix)
                .and_then(|index| index.parse::<u32>().ok())
                .map(|index| (prefix, index))
        })
}
