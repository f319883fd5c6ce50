// SPDX-License-Identifier: Apache-2.0

use crate::{
    DesiredRoutes, ErrorKind, InterfaceProto, OsFamily, RawGlobalSettings,
    RawInterface, RawRoutes,
};

fn normalize_yaml(
    yaml: &str,
    os_family: OsFamily,
) -> Result<crate::InterfaceSpec, crate::NetconvError> {
    let raw: RawInterface = serde_yaml::from_str(yaml).unwrap();
    raw.normalize(os_family)
}

fn assert_invalid(yaml: &str, os_family: OsFamily) {
    let e = normalize_yaml(yaml, os_family).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidSpec, "{yaml}: {e}");
}

#[test]
fn test_normalize_iface_defaults() {
    let spec = normalize_yaml("name: eth1\ntype: eth\n", OsFamily::Debian)
        .unwrap();
    assert!(spec.enabled);
    assert_eq!(spec.proto, InterfaceProto::Manual);

    let spec =
        normalize_yaml("name: eth1\ntype: eth\n", OsFamily::Rhel).unwrap();
    assert_eq!(spec.proto, InterfaceProto::None);
}

#[test]
fn test_normalize_iface_missing_fields() {
    assert_invalid("type: eth\n", OsFamily::Debian);
    assert_invalid("name: eth1\n", OsFamily::Debian);
}

#[test]
fn test_normalize_iface_proto_per_dialect() {
    assert_invalid("name: eth1\ntype: eth\nproto: none\n", OsFamily::Debian);
    assert_invalid("name: eth1\ntype: eth\nproto: manual\n", OsFamily::Rhel);
    assert_invalid("name: eth1\ntype: eth\nproto: ipv4ll\n", OsFamily::Rhel);
    assert!(
        normalize_yaml("name: eth1\ntype: eth\nproto: ipv4ll\n", OsFamily::Debian)
            .is_ok()
    );
}

#[test]
fn test_normalize_iface_invalid_type() {
    assert_invalid("name: eth1\ntype: wifi\n", OsFamily::Debian);
}

#[test]
fn test_normalize_iface_naming_rules() {
    assert_invalid("name: eth1\ntype: loopback\n", OsFamily::Debian);
    assert_invalid("name: lo\ntype: eth\n", OsFamily::Debian);
    assert_invalid("name: eth1\ntype: alias\n", OsFamily::Rhel);
    assert_invalid("name: eth1:0\ntype: eth\n", OsFamily::Rhel);
    assert_invalid("name: vlan100\ntype: vlan\n", OsFamily::Rhel);
    assert_invalid("name: a_very_long_name0\ntype: eth\n", OsFamily::Rhel);
    assert!(normalize_yaml("name: eth1:0\ntype: alias\n", OsFamily::Rhel).is_ok());
}

#[test]
fn test_normalize_iface_static_needs_ipaddr() {
    assert_invalid("name: eth1\ntype: eth\nproto: static\n", OsFamily::Rhel);
}

#[test]
fn test_normalize_iface_invalid_address() {
    assert_invalid(
        "name: eth1\ntype: eth\nproto: static\nipaddr: 192.0.2.300\n",
        OsFamily::Rhel,
    );
    assert_invalid("name: eth1\ntype: eth\nmtu: 0\n", OsFamily::Rhel);
}

#[test]
fn test_normalize_iface_unknown_field() {
    let result: Result<RawInterface, _> =
        serde_yaml::from_str("name: eth1\ntype: eth\nbogus: 1\n");
    assert!(result.is_err());
}

#[test]
fn test_normalize_routes() {
    let raw: RawRoutes = serde_yaml::from_str("name: eth1\n").unwrap();
    assert_eq!(raw.normalize().unwrap().routes, DesiredRoutes::Unspecified);

    let raw: RawRoutes =
        serde_yaml::from_str("name: eth1\nroutes: []\n").unwrap();
    assert_eq!(raw.normalize().unwrap().routes, DesiredRoutes::NoRoutes);

    let raw: RawRoutes = serde_yaml::from_str(
        "name: eth1\nroutes:\n- ipaddr: 10.0.0.0\n  netmask: \"8\"\n",
    )
    .unwrap();
    let spec = raw.normalize().unwrap();
    assert_eq!(spec.routes.entries().len(), 1);
    assert_eq!(spec.routes.entries()[0].netmask.to_string(), "255.0.0.0");

    let raw: RawRoutes = serde_yaml::from_str(
        "name: eth1\nroutes:\n- ipaddr: 10.0.0.0\n",
    )
    .unwrap();
    assert_eq!(raw.normalize().unwrap_err().kind(), ErrorKind::InvalidSpec);
}

#[test]
fn test_normalize_routes_invalid_name() {
    for name in ["\"\"", "x/../../../../escaped", "../eth0", "eth 0"] {
        let raw: RawRoutes =
            serde_yaml::from_str(&format!("name: {name}\nroutes: []\n"))
                .unwrap();
        let e = raw.normalize().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidSpec, "{name}: {e}");
    }
}

#[test]
fn test_normalize_global_settings() {
    let raw: RawGlobalSettings =
        serde_yaml::from_str("hostname: salt-host\n").unwrap();
    let spec = raw.normalize().unwrap();
    assert!(spec.enabled);
    assert_eq!(spec.hostname, "salt-host");

    let raw: RawGlobalSettings =
        serde_yaml::from_str("enabled: false\nhostname: bad host\n").unwrap();
    assert_eq!(raw.normalize().unwrap_err().kind(), ErrorKind::InvalidSpec);
}

#[test]
fn test_os_family_from_os_release() {
    assert_eq!(
        OsFamily::from_os_release("ID=ubuntu\nID_LIKE=debian\n"),
        Some(OsFamily::Debian)
    );
    assert_eq!(
        OsFamily::from_os_release("ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n"),
        Some(OsFamily::Rhel)
    );
    assert_eq!(OsFamily::from_os_release("ID=arch\n"), None);
}
