// SPDX-License-Identifier: Apache-2.0

//! Declarative reconciler of host network configuration
//!
//! Given a desired interface, route set or global network settings, the
//! [NetReconciler] reads the configuration persisted on the host, decides
//! whether anything has to change and, unless running in dry-run mode,
//! rewrites the configuration files and brings interfaces up or down.
//!
//! Two configuration dialects are supported, selected by
//! [NetconvConfig::os_family]:
//!  * [OsFamily::Debian] -- `/etc/network/interfaces` stanzas.
//!  * [OsFamily::Rhel] -- per interface `ifcfg-<name>` files.
//!
//! ## Examples
//!
//! ```no_run
//! use netconverge::{NetReconciler, NetconvConfig, OsFamily, RawInterface};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reconciler =
//!         NetReconciler::new(&NetconvConfig::new(OsFamily::Debian))?;
//!     let raw: RawInterface = serde_yaml::from_str(
//!         r#"
//!         name: eth1
//!         enabled: true
//!         proto: dhcp
//!         type: eth
//!         "#,
//!     )?;
//!     let spec = reconciler.normalize_interface(raw)?;
//!     let result = reconciler.reconcile_interface(&spec, true);
//!     println!("{}", result.comment);
//!     Ok(())
//! }
//! ```

mod apply;
mod backend;
mod command;
mod config;
mod current;
mod decide;
mod error;
mod global;
mod iface;
mod logging;
mod normalize;
mod os_family;
mod plan;
mod reader;
mod reconciler;
mod result;
mod route;

pub use self::apply::{Applier, ApplyOutcome};
pub use self::backend::NetBackend;
pub use self::command::{
    CommandOutput, CommandRunner, HostExec, KernelModules,
    SystemCommandRunner, SystemKernelModules,
};
pub use self::config::{DebianPaths, NetconvConfig, RhelPaths};
pub use self::current::{
    ActualGlobalSettings, ActualInterfaceState, ActualRoutes, CurrentState,
};
pub use self::decide::{
    decide_global_settings, decide_interface, decide_routes,
    iface_changed_fields,
};
pub use self::error::{ErrorKind, NetconvError};
pub use self::global::GlobalNetworkSpec;
pub use self::iface::{InterfaceProto, InterfaceSpec, InterfaceType};
pub use self::logging::NetconvLogLevel;
pub use self::normalize::{
    current_hostname, RawGlobalSettings, RawInterface, RawRouteEntry,
    RawRoutes,
};
pub use self::os_family::OsFamily;
pub use self::plan::{describe_changes, ChangedField, Plan, StatusTransition};
pub use self::reader::StateReader;
pub use self::reconciler::NetReconciler;
pub use self::result::{ReconcileResult, Subject};
pub use self::route::{DesiredRoutes, RouteEntry, RouteSpec};

pub(crate) use self::iface::LOOPBACK_IFACE_NAME;
pub(crate) use netconverge_derive::JsonDisplay;

#[cfg(test)]
mod unit_tests;
