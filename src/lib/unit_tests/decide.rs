// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use crate::{
    decide_global_settings, decide_interface, decide_routes, CurrentState,
    DesiredRoutes, GlobalNetworkSpec, InterfaceProto, InterfaceSpec,
    InterfaceType, OsFamily, Plan, RouteEntry, RouteSpec, StatusTransition,
};

fn eth(enabled: bool, proto: InterfaceProto) -> InterfaceSpec {
    InterfaceSpec::new("eth1", enabled, proto, InterfaceType::Eth)
}

fn transition_of(plan: &Plan<InterfaceSpec>) -> Option<StatusTransition> {
    match plan {
        Plan::Update { transition, .. } => Some(*transition),
        _ => None,
    }
}

#[test]
fn test_decide_iface_absent_is_add() {
    let desired = eth(true, InterfaceProto::Dhcp);
    let plan = decide_interface(&desired, &CurrentState::Absent);
    assert_eq!(plan, Plan::Add(desired));
}

#[test]
fn test_decide_iface_same_is_noop() {
    let desired = eth(false, InterfaceProto::Dhcp);
    let plan =
        decide_interface(&desired, &CurrentState::Present(desired.clone()));
    assert!(plan.is_noop());
}

#[test]
fn test_decide_iface_transitions() {
    let cases = [
        (false, true, InterfaceProto::None, StatusTransition::BringUp),
        (true, false, InterfaceProto::None, StatusTransition::BringDown),
        (true, true, InterfaceProto::Dhcp, StatusTransition::RestartNeeded),
        (false, false, InterfaceProto::Dhcp, StatusTransition::None),
    ];
    for (cur_enabled, des_enabled, des_proto, expected) in cases {
        let current = eth(cur_enabled, InterfaceProto::None);
        let desired = eth(des_enabled, des_proto);
        let plan = decide_interface(&desired, &CurrentState::Present(current));
        assert_eq!(transition_of(&plan), Some(expected));
    }
}

#[test]
fn test_decide_iface_changed_fields() {
    let current = eth(true, InterfaceProto::None);
    let mut desired = eth(true, InterfaceProto::Static);
    desired.ipaddr = Some(Ipv4Addr::new(192, 0, 2, 10));
    desired.mtu = Some(9000);

    let plan = decide_interface(&desired, &CurrentState::Present(current));

    let Plan::Update { changed, .. } = &plan else {
        panic!("Expecting update plan, got {plan:?}");
    };
    let described: Vec<String> =
        changed.iter().map(|c| c.describe()).collect();
    assert_eq!(
        described,
        vec![
            "proto: none -> static".to_string(),
            "ipaddr: (none) -> 192.0.2.10".to_string(),
            "mtu: (none) -> 9000".to_string(),
        ]
    );
}

fn route(ipaddr: [u8; 4], prefix_mask: [u8; 4]) -> RouteEntry {
    RouteEntry::new(Ipv4Addr::from(ipaddr), Ipv4Addr::from(prefix_mask), None)
}

#[test]
fn test_decide_routes_unspecified_is_noop() {
    let desired = RouteSpec::new("eth1", DesiredRoutes::Unspecified);
    for os_family in [OsFamily::Debian, OsFamily::Rhel] {
        assert!(decide_routes(&desired, os_family, &CurrentState::Absent)
            .is_noop());
        assert!(decide_routes(
            &desired,
            os_family,
            &CurrentState::Present(vec![route([10, 0, 0, 0], [255, 0, 0, 0])])
        )
        .is_noop());
    }
}

#[test]
fn test_decide_empty_routes_per_dialect() {
    let desired = RouteSpec::new("eth1", DesiredRoutes::from(Vec::new()));
    assert_eq!(desired.routes, DesiredRoutes::NoRoutes);

    assert_eq!(
        decide_routes(&desired, OsFamily::Debian, &CurrentState::Absent),
        Plan::Add(desired.clone())
    );
    assert!(decide_routes(&desired, OsFamily::Rhel, &CurrentState::Absent)
        .is_noop());
    assert!(decide_routes(
        &desired,
        OsFamily::Debian,
        &CurrentState::Present(Vec::new())
    )
    .is_noop());
}

#[test]
fn test_decide_routes_ignore_order_and_name() {
    let mut named = route([10, 0, 0, 0], [255, 0, 0, 0]);
    named.name = Some("backbone".to_string());
    let desired = RouteSpec::new(
        "eth1",
        DesiredRoutes::from(vec![
            named,
            route([172, 16, 0, 0], [255, 240, 0, 0]),
        ]),
    );
    let current = CurrentState::Present(vec![
        route([172, 16, 0, 0], [255, 240, 0, 0]),
        route([10, 0, 0, 0], [255, 0, 0, 0]),
    ]);
    assert!(decide_routes(&desired, OsFamily::Rhel, &current).is_noop());
}

#[test]
fn test_decide_routes_changed() {
    let desired = RouteSpec::new(
        "eth1",
        DesiredRoutes::from(vec![route([10, 0, 0, 0], [255, 0, 0, 0])]),
    );
    let current =
        CurrentState::Present(vec![route([172, 16, 0, 0], [255, 240, 0, 0])]);

    let plan = decide_routes(&desired, OsFamily::Debian, &current);

    let Plan::Update {
        changed,
        transition,
        ..
    } = &plan
    else {
        panic!("Expecting update plan, got {plan:?}");
    };
    assert_eq!(*transition, StatusTransition::None);
    assert_eq!(
        crate::describe_changes(&changed),
        "route: 172.16.0.0/255.240.0.0 -> (none)\n\
         route: (none) -> 10.0.0.0/255.0.0.0"
    );
}

#[test]
fn test_decide_global_settings() {
    let desired = GlobalNetworkSpec::new(true, "host1");
    assert_eq!(
        decide_global_settings(&desired, &CurrentState::Absent),
        Plan::Add(desired.clone())
    );
    assert!(decide_global_settings(
        &desired,
        &CurrentState::Present(desired.clone())
    )
    .is_noop());

    let plan = decide_global_settings(
        &desired,
        &CurrentState::Present(GlobalNetworkSpec::new(false, "host0")),
    );
    let Plan::Update { changed, .. } = &plan else {
        panic!("Expecting update plan, got {plan:?}");
    };
    assert_eq!(
        crate::describe_changes(&changed),
        "enabled: false -> true\nhostname: host0 -> host1"
    );
}
