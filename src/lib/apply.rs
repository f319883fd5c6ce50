// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use crate::{
    decide_global_settings, decide_interface, decide_routes,
    describe_changes, ErrorKind, GlobalNetworkSpec, InterfaceSpec,
    NetBackend, NetconvError, Plan, RouteSpec, StateReader,
};

pub(crate) const CHANGE_INTERFACE: &str = "interface";
pub(crate) const CHANGE_STATUS: &str = "status";
pub(crate) const CHANGE_ROUTES: &str = "network_routes";
pub(crate) const CHANGE_SETTINGS: &str = "network_settings";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
/// What an [Applier] did with a plan
pub struct ApplyOutcome {
    pub succeeded: bool,
    pub dry_run: bool,
    /// Field name to description of the change made, empty for dry run.
    pub applied_changes: BTreeMap<String, String>,
    pub error: Option<NetconvError>,
}

impl ApplyOutcome {
    fn dry_run() -> Self {
        Self {
            succeeded: true,
            dry_run: true,
            ..Default::default()
        }
    }

    fn new(
        applied_changes: BTreeMap<String, String>,
        result: Result<(), NetconvError>,
    ) -> Self {
        match result {
            Ok(()) => Self {
                succeeded: true,
                dry_run: false,
                applied_changes,
                error: None,
            },
            Err(e) => {
                log::error!("{e}");
                Self {
                    succeeded: false,
                    dry_run: false,
                    applied_changes,
                    error: Some(e),
                }
            }
        }
    }
}

/// Executes a [Plan] through the [NetBackend]. Failures are reported in
/// [ApplyOutcome] and never retried.
#[derive(Debug, Clone, Copy)]
pub struct Applier<'a> {
    backend: &'a NetBackend,
    verify: bool,
}

impl<'a> Applier<'a> {
    pub fn new(backend: &'a NetBackend, verify: bool) -> Self {
        Self { backend, verify }
    }

    pub fn apply_interface(
        &self,
        plan: &Plan<InterfaceSpec>,
        dry_run: bool,
    ) -> ApplyOutcome {
        if dry_run {
            return ApplyOutcome::dry_run();
        }
        let mut changes = BTreeMap::new();
        let result = match plan {
            Plan::NoOp => Ok(()),
            Plan::Add(desired) => self.add_interface(desired, &mut changes),
            Plan::Update {
                desired,
                changed,
                transition,
            } => self
                .backend
                .write_interface(desired)
                .and_then(|()| {
                    changes.insert(
                        CHANGE_INTERFACE.to_string(),
                        describe_changes(changed),
                    );
                    if let Some((enabled, restart)) =
                        transition.to_apply_args()
                    {
                        let status = self.backend.apply_interface_state(
                            &desired.name,
                            enabled,
                            restart,
                        )?;
                        changes.insert(CHANGE_STATUS.to_string(), status);
                    }
                    Ok(())
                })
                .and_then(|()| self.verify_interface(desired)),
        };
        ApplyOutcome::new(changes, result)
    }

    fn add_interface(
        &self,
        desired: &InterfaceSpec,
        changes: &mut BTreeMap<String, String>,
    ) -> Result<(), NetconvError> {
        self.backend.write_interface(desired)?;
        changes.insert(
            CHANGE_INTERFACE.to_string(),
            "Added network interface.".to_string(),
        );
        if desired.enabled {
            let status =
                self.backend
                    .apply_interface_state(&desired.name, true, false)?;
            changes.insert(CHANGE_STATUS.to_string(), status);
        }
        self.verify_interface(desired)
    }

    fn verify_interface(
        &self,
        desired: &InterfaceSpec,
    ) -> Result<(), NetconvError> {
        if !self.verify {
            return Ok(());
        }
        let actual = StateReader::new(self.backend).interface(desired)?;
        match decide_interface(desired, &actual) {
            Plan::NoOp => Ok(()),
            plan => Err(verification_error(
                &format!("interface {}", desired.name),
                &plan,
            )),
        }
    }

    pub fn apply_routes(
        &self,
        plan: &Plan<RouteSpec>,
        dry_run: bool,
    ) -> ApplyOutcome {
        if dry_run {
            return ApplyOutcome::dry_run();
        }
        let mut changes = BTreeMap::new();
        let result = match plan {
            Plan::NoOp => Ok(()),
            Plan::Add(desired) | Plan::Update { desired, .. } => self
                .backend
                .write_routes(&desired.name, desired.routes.entries())
                .and_then(|()| {
                    let verb = if matches!(plan, Plan::Add(_)) {
                        "Added"
                    } else {
                        "Updated"
                    };
                    changes.insert(
                        CHANGE_ROUTES.to_string(),
                        format!("{verb} interface {} routes.", desired.name),
                    );
                    self.verify_routes(desired)
                }),
        };
        ApplyOutcome::new(changes, result)
    }

    fn verify_routes(&self, desired: &RouteSpec) -> Result<(), NetconvError> {
        if !self.verify {
            return Ok(());
        }
        let actual = StateReader::new(self.backend).routes(desired)?;
        match decide_routes(desired, self.backend.os_family(), &actual) {
            Plan::NoOp => Ok(()),
            plan => Err(verification_error(
                &format!("routes of interface {}", desired.name),
                &plan,
            )),
        }
    }

    pub fn apply_global_settings(
        &self,
        plan: &Plan<GlobalNetworkSpec>,
        dry_run: bool,
    ) -> ApplyOutcome {
        if dry_run {
            return ApplyOutcome::dry_run();
        }
        let mut changes = BTreeMap::new();
        let result = match plan {
            Plan::NoOp => Ok(()),
            Plan::Add(desired) => self
                .backend
                .write_global_settings(desired, true)
                .and_then(|()| {
                    changes.insert(
                        CHANGE_SETTINGS.to_string(),
                        "Added global network settings.".to_string(),
                    );
                    self.verify_global_settings(desired)
                }),
            Plan::Update {
                desired, changed, ..
            } => {
                let hostname_changed =
                    changed.iter().any(|c| c.field == "hostname");
                self.backend
                    .write_global_settings(desired, hostname_changed)
                    .and_then(|()| {
                        changes.insert(
                            CHANGE_SETTINGS.to_string(),
                            "Updated global network settings.".to_string(),
                        );
                        self.verify_global_settings(desired)
                    })
            }
        };
        ApplyOutcome::new(changes, result)
    }

    fn verify_global_settings(
        &self,
        desired: &GlobalNetworkSpec,
    ) -> Result<(), NetconvError> {
        if !self.verify {
            return Ok(());
        }
        let actual = StateReader::new(self.backend).global_settings()?;
        match decide_global_settings(desired, &actual) {
            Plan::NoOp => Ok(()),
            plan => Err(verification_error("global network settings", &plan)),
        }
    }
}

fn verification_error<T>(subject: &str, plan: &Plan<T>) -> NetconvError {
    let detail = match plan {
        Plan::Update { changed, .. } => describe_changes(changed),
        _ => "configuration not found".to_string(),
    };
    NetconvError::new(
        ErrorKind::VerificationError,
        format!(
            "Verification failure, persisted {subject} does not match \
             desired state after applying: {detail}"
        ),
    )
}
