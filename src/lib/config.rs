// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, JsonDisplay, NetconvError, NetconvLogLevel, OsFamily};

#[derive(
    Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonDisplay,
)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
#[non_exhaustive]
pub struct NetconvConfig {
    /// Configuration dialect of the host. Never guessed by the library.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_family: Option<OsFamily>,
    /// Prefix prepended to every persisted path.
    pub root: PathBuf,
    pub debian: DebianPaths,
    pub rhel: RhelPaths,
    /// Skip re-reading persisted state after applying.
    pub no_verify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<NetconvLogLevel>,
}

impl Default for NetconvConfig {
    fn default() -> Self {
        Self {
            os_family: None,
            root: PathBuf::from("/"),
            debian: DebianPaths::default(),
            rhel: RhelPaths::default(),
            no_verify: false,
            log_level: None,
        }
    }
}

impl NetconvConfig {
    pub fn new(os_family: OsFamily) -> Self {
        Self {
            os_family: Some(os_family),
            ..Default::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, NetconvError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NetconvError::new(
                ErrorKind::InvalidArgument,
                format!("Failed to read config file {}: {e}", path.display()),
            )
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        log::debug!("Loaded config {config} from {}", path.display());
        Ok(config)
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Resolve an absolute host path below [NetconvConfig::root].
    pub fn rooted(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("/") {
            Ok(relative) => self.root.join(relative),
            Err(_) => self.root.join(path),
        }
    }

    pub(crate) fn os_family(&self) -> Result<OsFamily, NetconvError> {
        self.os_family.ok_or_else(|| {
            NetconvError::new(
                ErrorKind::InvalidArgument,
                "The os-family is not configured, please choose between \
                 `debian` and `rhel`"
                    .to_string(),
            )
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
#[non_exhaustive]
pub struct DebianPaths {
    pub interfaces_file: PathBuf,
    pub if_up_dir: PathBuf,
    pub if_down_dir: PathBuf,
    pub networking_defaults: PathBuf,
    pub hostname_file: PathBuf,
}

impl Default for DebianPaths {
    fn default() -> Self {
        Self {
            interfaces_file: PathBuf::from("/etc/network/interfaces"),
            if_up_dir: PathBuf::from("/etc/network/if-up.d"),
            if_down_dir: PathBuf::from("/etc/network/if-down.d"),
            networking_defaults: PathBuf::from("/etc/default/networking"),
            hostname_file: PathBuf::from("/etc/hostname"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
#[non_exhaustive]
pub struct RhelPaths {
    pub network_scripts_dir: PathBuf,
    pub network_file: PathBuf,
}

impl Default for RhelPaths {
    fn default() -> Self {
        Self {
            network_scripts_dir: PathBuf::from(
                "/etc/sysconfig/network-scripts",
            ),
            network_file: PathBuf::from("/etc/sysconfig/network"),
        }
    }
}
