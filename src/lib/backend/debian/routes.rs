// SPDX-License-Identifier: Apache-2.0

use crate::backend::{parse_ipv4, parse_netmask};
use crate::{ErrorKind, NetconvError, RouteEntry};

const SCRIPT_HEADER: &str = "#!/bin/sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RouteAction {
    Add,
    Del,
}

impl RouteAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Del => "del",
        }
    }
}

/// Generate the `if-up.d`/`if-down.d` script of the interface. An empty
/// route set still produces a valid script holding only the header.
pub(crate) fn gen_route_script(
    iface_name: &str,
    routes: &[RouteEntry],
    action: RouteAction,
) -> String {
    let mut ret = format!(
        "{SCRIPT_HEADER}\n# Static routes of interface {iface_name}, \
         generated by netconverge\n"
    );
    if routes.is_empty() {
        return ret;
    }
    ret.push_str(&format!("if [ \"$IFACE\" = \"{iface_name}\" ]; then\n"));
    for route in routes {
        let via = match route.gateway {
            Some(gw) => format!(" via {gw}"),
            None => String::new(),
        };
        ret.push_str(&format!(
            "    ip route {} {}/{}{via} dev {iface_name}\n",
            action.as_str(),
            route.ipaddr,
            route.netmask
        ));
    }
    ret.push_str("fi\n");
    ret
}

pub(crate) fn parse_route_script(
    content: &str,
) -> Result<Vec<RouteEntry>, NetconvError> {
    let mut ret = Vec::new();
    for line in content.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if let ["ip", "route", "add", rest @ ..] = words.as_slice() {
            ret.push(parse_route_args(rest).map_err(|e| {
                NetconvError::new(
                    e.kind(),
                    format!("Invalid route line `{}`: {}", line.trim(), e.msg()),
                )
            })?);
        }
    }
    Ok(ret)
}

fn parse_route_args(args: &[&str]) -> Result<RouteEntry, NetconvError> {
    let Some((&dst, mut rest)) = args.split_first() else {
        return Err(NetconvError::new(
            ErrorKind::ReadError,
            "missing route destination".to_string(),
        ));
    };
    let (addr, mask) = dst.split_once('/').unwrap_or((dst, "32"));
    let mut route = RouteEntry::new(
        parse_ipv4(addr, ErrorKind::ReadError)?,
        parse_netmask(mask, ErrorKind::ReadError)?,
        None,
    );
    while let [key, value, remains @ ..] = rest {
        if *key == "via" {
            route.gateway = Some(parse_ipv4(value, ErrorKind::ReadError)?);
        }
        rest = remains;
    }
    Ok(route)
}
