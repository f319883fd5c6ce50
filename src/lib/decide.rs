// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

use crate::route::is_same_route_set;
use crate::{
    ActualGlobalSettings, ActualInterfaceState, ActualRoutes, ChangedField,
    CurrentState, DesiredRoutes, GlobalNetworkSpec, InterfaceSpec, OsFamily,
    Plan, RouteEntry, RouteSpec, StatusTransition,
};

fn opt_to_string<T: Display>(v: Option<&T>) -> Option<String> {
    v.map(|v| v.to_string())
}

fn push_if_changed<T: PartialEq + Display>(
    changed: &mut Vec<ChangedField>,
    field: &str,
    current: Option<&T>,
    desired: Option<&T>,
) {
    if current != desired {
        changed.push(ChangedField::new(
            field,
            opt_to_string(current),
            opt_to_string(desired),
        ));
    }
}

/// Attributes differing between current and desired interface.
pub fn iface_changed_fields(
    current: &InterfaceSpec,
    desired: &InterfaceSpec,
) -> Vec<ChangedField> {
    let mut changed = Vec::new();
    push_if_changed(
        &mut changed,
        "enabled",
        Some(&current.enabled),
        Some(&desired.enabled),
    );
    push_if_changed(
        &mut changed,
        "proto",
        Some(&current.proto),
        Some(&desired.proto),
    );
    push_if_changed(
        &mut changed,
        "type",
        Some(&current.iface_type),
        Some(&desired.iface_type),
    );
    push_if_changed(
        &mut changed,
        "ipaddr",
        current.ipaddr.as_ref(),
        desired.ipaddr.as_ref(),
    );
    push_if_changed(
        &mut changed,
        "netmask",
        current.netmask.as_ref(),
        desired.netmask.as_ref(),
    );
    push_if_changed(
        &mut changed,
        "gateway",
        current.gateway.as_ref(),
        desired.gateway.as_ref(),
    );
    push_if_changed(
        &mut changed,
        "mtu",
        current.mtu.as_ref(),
        desired.mtu.as_ref(),
    );
    changed
}

pub fn decide_interface(
    desired: &InterfaceSpec,
    actual: &ActualInterfaceState,
) -> Plan<InterfaceSpec> {
    let current = match actual {
        CurrentState::Absent => return Plan::Add(desired.clone()),
        CurrentState::Present(current) => current,
    };
    let changed = iface_changed_fields(current, desired);
    if changed.is_empty() {
        return Plan::NoOp;
    }
    let transition = match (current.enabled, desired.enabled) {
        (false, true) => StatusTransition::BringUp,
        (true, false) => StatusTransition::BringDown,
        // Only reachable with non-`enabled` field changed
        (true, true) => StatusTransition::RestartNeeded,
        (false, false) => StatusTransition::None,
    };
    Plan::Update {
        desired: desired.clone(),
        changed,
        transition,
    }
}

fn route_changed_fields(
    current: &[RouteEntry],
    desired: &[RouteEntry],
) -> Vec<ChangedField> {
    let contains = |rts: &[RouteEntry], rt: &RouteEntry| {
        rts.iter().any(|r| r.sort_key() == rt.sort_key())
    };
    let mut changed: Vec<ChangedField> = current
        .iter()
        .filter(|rt| !contains(desired, rt))
        .map(|rt| ChangedField::new("route", Some(rt.describe()), None))
        .collect();
    changed.extend(
        desired
            .iter()
            .filter(|rt| !contains(current, rt))
            .map(|rt| ChangedField::new("route", None, Some(rt.describe()))),
    );
    changed
}

/// Routes never mentioned are left alone. Whether an explicitly empty
/// route set has to be persisted depends on the dialect, see
/// [OsFamily::keeps_empty_route_set].
pub fn decide_routes(
    desired: &RouteSpec,
    os_family: OsFamily,
    actual: &ActualRoutes,
) -> Plan<RouteSpec> {
    let persisted_if_empty = os_family.keeps_empty_route_set();
    match (&desired.routes, actual) {
        (DesiredRoutes::Unspecified, _) => Plan::NoOp,
        (DesiredRoutes::NoRoutes, CurrentState::Absent)
            if !persisted_if_empty =>
        {
            Plan::NoOp
        }
        (_, CurrentState::Absent) => Plan::Add(desired.clone()),
        (routes, CurrentState::Present(current)) => {
            if is_same_route_set(current, routes.entries()) {
                Plan::NoOp
            } else {
                Plan::Update {
                    desired: desired.clone(),
                    changed: route_changed_fields(current, routes.entries()),
                    transition: StatusTransition::None,
                }
            }
        }
    }
}

pub fn decide_global_settings(
    desired: &GlobalNetworkSpec,
    actual: &ActualGlobalSettings,
) -> Plan<GlobalNetworkSpec> {
    let current = match actual {
        CurrentState::Absent => return Plan::Add(desired.clone()),
        CurrentState::Present(current) => current,
    };
    let mut changed = Vec::new();
    push_if_changed(
        &mut changed,
        "enabled",
        Some(&current.enabled),
        Some(&desired.enabled),
    );
    push_if_changed(
        &mut changed,
        "hostname",
        Some(&current.hostname),
        Some(&desired.hostname),
    );
    if changed.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update {
            desired: desired.clone(),
            changed,
            transition: StatusTransition::None,
        }
    }
}
