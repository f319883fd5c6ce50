// SPDX-License-Identifier: Apache-2.0

use super::{TestHost, TEST_IFACE};
use crate::{
    ErrorKind, GlobalNetworkSpec, InterfaceProto, InterfaceType, OsFamily,
    RawInterface, RawRoutes, RouteSpec,
};

const IFCFG_PATH: &str = "/etc/sysconfig/network-scripts/ifcfg-salttest0";
const ROUTE_PATH: &str = "/etc/sysconfig/network-scripts/route-salttest0";
const NETWORK_PATH: &str = "/etc/sysconfig/network";

fn routes(yaml: &str) -> RouteSpec {
    let raw: RawRoutes = serde_yaml::from_str(yaml).unwrap();
    raw.normalize().unwrap()
}

#[test]
fn test_rhel_add_iface() {
    let host = TestHost::new(OsFamily::Rhel);
    let spec = host.iface(true, "none");

    let result = host.reconciler.reconcile_interface(&spec, true);
    assert_eq!(result.result, None);
    assert_eq!(result.comment, "Interface salttest0 is set to be added.");
    assert!(!host.exists(IFCFG_PATH));

    let result = host.reconciler.reconcile_interface(&spec, false);
    assert_eq!(result.result, Some(true));
    assert_eq!(result.comment, "Interface salttest0 added.");
    assert_eq!(
        host.read(IFCFG_PATH),
        "DEVICE=salttest0\nTYPE=Ethernet\nONBOOT=yes\nBOOTPROTO=none\n"
    );
    assert_eq!(host.fake.commands(), vec!["ifup salttest0".to_string()]);

    let result = host.reconciler.reconcile_interface(&spec, false);
    assert_eq!(result.comment, "Interface salttest0 is up to date.");
}

#[test]
fn test_rhel_disabled_add_runs_no_command() {
    let host = TestHost::new(OsFamily::Rhel);

    let result = host
        .reconciler
        .reconcile_interface(&host.iface(false, "dhcp"), false);

    assert_eq!(result.result, Some(true));
    assert!(!result.changes.contains_key("status"));
    assert!(host.fake.commands().is_empty());
    assert!(host.read(IFCFG_PATH).contains("ONBOOT=no\n"));
}

#[test]
fn test_rhel_update_keeps_unmanaged_keys() {
    let host = TestHost::new(OsFamily::Rhel);
    host.write(
        IFCFG_PATH,
        "# Created by installer\nDEVICE=salttest0\nHWADDR=02:00:00:00:00:01\n\
         ONBOOT=yes\nBOOTPROTO=dhcp\nNM_CONTROLLED=no\n",
    );
    let raw: RawInterface = serde_yaml::from_str(
        r"
        name: salttest0
        type: eth
        proto: static
        ipaddr: 192.0.2.10
        netmask: 255.255.255.0
        ",
    )
    .unwrap();
    let spec = host.reconciler.normalize_interface(raw).unwrap();

    let result = host.reconciler.reconcile_interface(&spec, true);
    assert_eq!(
        result.comment,
        "Interface salttest0 is set to be updated:\n\
         proto: dhcp -> static\n\
         ipaddr: (none) -> 192.0.2.10\n\
         netmask: (none) -> 255.255.255.0"
    );

    let result = host.reconciler.reconcile_interface(&spec, false);
    assert_eq!(result.result, Some(true));
    assert_eq!(
        result.changes.get("status").map(String::as_str),
        Some("Interface salttest0 restart to validate")
    );
    assert_eq!(
        host.read(IFCFG_PATH),
        "# Created by installer\nDEVICE=salttest0\nHWADDR=02:00:00:00:00:01\n\
         ONBOOT=yes\nBOOTPROTO=static\nNM_CONTROLLED=no\nTYPE=Ethernet\n\
         IPADDR=192.0.2.10\nNETMASK=255.255.255.0\n"
    );
}

#[test]
fn test_rhel_read_ifcfg_defaults() {
    let host = TestHost::new(OsFamily::Rhel);
    host.write(IFCFG_PATH, "DEVICE=salttest0\n");

    let actual = host.reconciler.backend().read_interface(TEST_IFACE).unwrap();
    let spec = actual.as_option().unwrap();

    assert!(!spec.enabled);
    assert_eq!(spec.proto, InterfaceProto::None);
    assert_eq!(spec.iface_type, InterfaceType::Eth);
}

#[test]
fn test_rhel_read_ifcfg_unknown_type() {
    let host = TestHost::new(OsFamily::Rhel);
    host.write(IFCFG_PATH, "DEVICE=salttest0\nTYPE=Wireless\n");

    let result = host
        .reconciler
        .reconcile_interface(&host.iface(true, "none"), false);

    assert_eq!(result.result, Some(false));
    assert!(result.comment.contains("TYPE"));
    assert!(host.fake.commands().is_empty());
}

#[test]
fn test_rhel_read_ifcfg_invalid_onboot() {
    let host = TestHost::new(OsFamily::Rhel);
    let corrupt = "DEVICE=salttest0\nONBOOT=maybe\n";
    host.write(IFCFG_PATH, corrupt);

    let e = host
        .reconciler
        .backend()
        .read_interface(TEST_IFACE)
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ReadError);

    let result = host
        .reconciler
        .reconcile_interface(&host.iface(true, "none"), false);
    assert_eq!(result.result, Some(false));
    assert!(result.comment.contains("ONBOOT"));
    assert!(result.changes.is_empty());
    assert_eq!(host.read(IFCFG_PATH), corrupt);
    assert!(host.fake.commands().is_empty());
}

#[test]
fn test_rhel_corrupt_ifcfg_untouched() {
    let host = TestHost::new(OsFamily::Rhel);
    let corrupt = "DEVICE=salttest0\nONBOOT=yes\nMTU=abc\n";
    host.write(IFCFG_PATH, corrupt);

    let result = host
        .reconciler
        .reconcile_interface(&host.iface(true, "none"), false);

    assert_eq!(result.result, Some(false));
    assert!(result.comment.contains("read-error"));
    assert_eq!(host.read(IFCFG_PATH), corrupt);
}

#[test]
fn test_rhel_verification_failure() {
    let host = TestHost::new(OsFamily::Rhel);
    let rewritten = "DEVICE=salttest0\nONBOOT=no\nBOOTPROTO=none\n";
    host.fake.rewrite_on("ifup", &host.path(IFCFG_PATH), rewritten);

    let result = host
        .reconciler
        .reconcile_interface(&host.iface(true, "none"), false);

    assert_eq!(result.result, Some(false));
    assert!(result
        .comment
        .starts_with("Failed to reconcile interface salttest0: "));
    assert!(result.comment.contains("verification-error"));
    assert!(result.comment.contains("enabled: true -> false"));
    assert_eq!(host.fake.commands(), vec!["ifup salttest0".to_string()]);
}

#[test]
fn test_rhel_no_verify_skips_reread() {
    let host = TestHost::with_verify(OsFamily::Rhel, false);
    let rewritten = "DEVICE=salttest0\nONBOOT=no\nBOOTPROTO=none\n";
    host.fake.rewrite_on("ifup", &host.path(IFCFG_PATH), rewritten);

    let result = host
        .reconciler
        .reconcile_interface(&host.iface(true, "none"), false);

    assert_eq!(result.result, Some(true));
    assert_eq!(result.comment, "Interface salttest0 added.");
    assert_eq!(host.read(IFCFG_PATH), rewritten);
}

#[test]
fn test_rhel_vlan_iface() {
    let host = TestHost::new(OsFamily::Rhel);
    let spec = host
        .reconciler
        .normalize_interface(RawInterface::new("eth0.100", "vlan"))
        .unwrap();

    assert_eq!(host.reconciler.reconcile_interface(&spec, false).result, Some(true));

    let content = host.read("/etc/sysconfig/network-scripts/ifcfg-eth0.100");
    assert!(content.contains("TYPE=Vlan\n"));
    assert!(content.contains("VLAN=yes\nPHYSDEV=eth0\n"));
}

#[test]
fn test_rhel_empty_routes_up_to_date() {
    let host = TestHost::new(OsFamily::Rhel);
    let spec = routes("name: salttest_route\nroutes: []\n");

    let result = host.reconciler.reconcile_routes(&spec, true);

    assert_eq!(result.result, Some(true));
    assert_eq!(
        result.comment,
        "Interface salttest_route routes are up to date."
    );
}

#[test]
fn test_rhel_routes_add_and_remove() {
    let host = TestHost::new(OsFamily::Rhel);
    let spec = routes(
        r"
        name: salttest0
        routes:
          - ipaddr: 198.51.100.0
            netmask: 255.255.255.0
            gateway: 192.0.2.1
          - ipaddr: 203.0.113.0
            netmask: 255.255.255.128
        ",
    );

    let result = host.reconciler.reconcile_routes(&spec, false);
    assert_eq!(result.result, Some(true));
    assert_eq!(result.comment, "Interface salttest0 routes added.");
    assert_eq!(
        host.read(ROUTE_PATH),
        "ADDRESS0=198.51.100.0\nNETMASK0=255.255.255.0\nGATEWAY0=192.0.2.1\n\
         ADDRESS1=203.0.113.0\nNETMASK1=255.255.255.128\n"
    );

    let result = host
        .reconciler
        .reconcile_routes(&routes("name: salttest0\nroutes: []\n"), false);
    assert_eq!(result.result, Some(true));
    assert_eq!(result.comment, "Interface salttest0 routes updated.");
    assert_eq!(
        result.changes.get("network_routes").map(String::as_str),
        Some("Updated interface salttest0 routes.")
    );
    assert!(!host.exists(ROUTE_PATH));
}

#[test]
fn test_rhel_route_order_does_not_matter() {
    let host = TestHost::new(OsFamily::Rhel);
    host.write(
        ROUTE_PATH,
        "ADDRESS1=198.51.100.0\nNETMASK1=255.255.255.0\n\
         ADDRESS0=203.0.113.0\nNETMASK0=255.255.255.128\n",
    );
    let spec = routes(
        r"
        name: salttest0
        routes:
          - ipaddr: 198.51.100.0
            netmask: 255.255.255.0
          - ipaddr: 203.0.113.0
            netmask: 255.255.255.128
        ",
    );

    let result = host.reconciler.reconcile_routes(&spec, false);

    assert_eq!(result.comment, "Interface salttest0 routes are up to date.");
}

#[test]
fn test_rhel_global_settings() {
    let host = TestHost::new(OsFamily::Rhel);
    let spec = GlobalNetworkSpec::new(true, "salt-host");

    let result = host.reconciler.reconcile_global_settings(&spec, false);
    assert_eq!(result.comment, "Global network settings added.");
    assert_eq!(
        host.read(NETWORK_PATH),
        "NETWORKING=yes\nHOSTNAME=salt-host\n"
    );
    assert_eq!(host.fake.commands(), vec!["hostname salt-host".to_string()]);
    host.fake.clear_commands();

    let renamed = GlobalNetworkSpec::new(true, "salt-host2");
    let result = host.reconciler.reconcile_global_settings(&renamed, true);
    assert_eq!(result.result, None);
    assert_eq!(
        result.comment,
        "Global network settings are set to be updated:\n\
         hostname: salt-host -> salt-host2"
    );
    assert!(host.fake.commands().is_empty());

    let result = host.reconciler.reconcile_global_settings(&renamed, false);
    assert_eq!(result.comment, "Global network settings updated.");
    assert_eq!(host.fake.commands(), vec!["hostname salt-host2".to_string()]);
}

#[test]
fn test_rhel_hostname_command_failure() {
    let host = TestHost::new(OsFamily::Rhel);
    host.fake.fail_on("hostname");

    let result = host.reconciler.reconcile_global_settings(
        &GlobalNetworkSpec::new(true, "salt-host"),
        false,
    );

    assert_eq!(result.result, Some(false));
    assert!(result
        .comment
        .starts_with("Failed to reconcile global network settings: "));
}
