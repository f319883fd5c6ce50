// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use super::FakeHost;
use crate::{
    ErrorKind, NetReconciler, NetconvConfig, NetconvLogLevel, OsFamily,
};

#[test]
fn test_config_from_file() {
    let tmp_dir = tempfile::TempDir::new().unwrap();
    let path = tmp_dir.path().join("netconverge.yml");
    std::fs::write(
        &path,
        r"
        os-family: rhel
        root: /mnt/sysimage
        rhel:
          network-file: /etc/sysconfig/network.custom
        no-verify: true
        log-level: debug
        ",
    )
    .unwrap();

    let config = NetconvConfig::from_file(&path).unwrap();

    assert_eq!(config.os_family, Some(OsFamily::Rhel));
    assert!(config.no_verify);
    assert_eq!(config.log_level, Some(NetconvLogLevel::Debug));
    assert_eq!(
        config.rooted(&config.rhel.network_file),
        PathBuf::from("/mnt/sysimage/etc/sysconfig/network.custom")
    );
    assert_eq!(
        config.rhel.network_scripts_dir,
        PathBuf::from("/etc/sysconfig/network-scripts")
    );
}

#[test]
fn test_config_unknown_key() {
    let result: Result<NetconvConfig, _> =
        serde_yaml::from_str("os-family: debian\nbackend: nm\n");
    assert!(result.is_err());
}

#[test]
fn test_config_missing_os_family() {
    let config = NetconvConfig::default();
    let e = NetReconciler::new_with_exec(&config, FakeHost::default().exec())
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_config_rooted_relative_path() {
    let config = NetconvConfig::new(OsFamily::Debian).with_root("/tmp/root");
    assert_eq!(
        config.rooted(Path::new("etc/hostname")),
        PathBuf::from("/tmp/root/etc/hostname")
    );
}
