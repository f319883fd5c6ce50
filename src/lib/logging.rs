// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, NetconvError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Deserialize,
    Serialize,
)]
#[repr(usize)]
#[serde(rename_all = "lowercase")]
pub enum NetconvLogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl NetconvLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    /// Raise the level by `count` steps, saturating at
    /// [NetconvLogLevel::Trace].
    pub fn raised_by(self, count: u8) -> Self {
        let mut level = self;
        for _ in 0..count {
            level = match level {
                Self::Off => Self::Error,
                Self::Error => Self::Warn,
                Self::Warn => Self::Info,
                Self::Info => Self::Debug,
                Self::Debug | Self::Trace => Self::Trace,
            };
        }
        level
    }
}

impl From<log::LevelFilter> for NetconvLogLevel {
    fn from(d: log::LevelFilter) -> Self {
        match d {
            log::LevelFilter::Off => Self::Off,
            log::LevelFilter::Error => Self::Error,
            log::LevelFilter::Warn => Self::Warn,
            log::LevelFilter::Info => Self::Info,
            log::LevelFilter::Debug => Self::Debug,
            log::LevelFilter::Trace => Self::Trace,
        }
    }
}

impl From<NetconvLogLevel> for log::LevelFilter {
    fn from(v: NetconvLogLevel) -> Self {
        match v {
            NetconvLogLevel::Off => Self::Off,
            NetconvLogLevel::Error => Self::Error,
            NetconvLogLevel::Warn => Self::Warn,
            NetconvLogLevel::Info => Self::Info,
            NetconvLogLevel::Debug => Self::Debug,
            NetconvLogLevel::Trace => Self::Trace,
        }
    }
}

impl std::fmt::Display for NetconvLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NetconvLogLevel {
    type Err = NetconvError;

    fn from_str(s: &str) -> Result<Self, NetconvError> {
        match s {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(NetconvError::new(
                ErrorKind::InvalidArgument,
                format!("Invalid logging level {s}"),
            )),
        }
    }
}
