// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::JsonDisplay;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Please report this as bug to upstream
    Bug,
    /// Desired interface, routes or global settings are invalid or use
    /// a value the selected backend does not support
    InvalidSpec,
    /// Persisted network configuration is unreadable or corrupted
    ReadError,
    /// Failed to persist network configuration
    WriteError,
    /// OS command for bring-up, bring-down or restart failed
    CommandError,
    /// Post applied configuration does not match with desired state
    VerificationError,
    /// Invalid argument
    InvalidArgument,
    /// Not supported
    NoSupport,
}

// Try not implement From for NetconvError here unless you are sure this
// error should always convert to certain type of ErrorKind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct NetconvError {
    pub kind: ErrorKind,
    pub msg: String,
}

impl std::fmt::Display for NetconvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl NetconvError {
    pub fn new(kind: ErrorKind, msg: String) -> Self {
        Self { kind, msg }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        self.msg.as_str()
    }

    pub(crate) fn invalid_spec(msg: String) -> Self {
        Self::new(ErrorKind::InvalidSpec, msg)
    }
}

impl std::error::Error for NetconvError {}

impl From<serde_json::Error> for NetconvError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::Bug, format!("serde_json::Error: {e}"))
    }
}

impl From<serde_yaml::Error> for NetconvError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("serde_yaml::Error: {e}"),
        )
    }
}

impl From<std::io::Error> for NetconvError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Bug, format!("std::io::Error: {e}"))
    }
}

impl From<std::net::AddrParseError> for NetconvError {
    fn from(e: std::net::AddrParseError) -> Self {
        Self::new(ErrorKind::InvalidSpec, format!("Invalid IP address: {e}"))
    }
}
