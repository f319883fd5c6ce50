// SPDX-License-Identifier: Apache-2.0

use crate::{
    decide_global_settings, decide_interface, decide_routes, Applier,
    GlobalNetworkSpec, HostExec, InterfaceSpec, NetBackend, NetconvConfig,
    NetconvError, OsFamily, RawGlobalSettings, RawInterface, RawRoutes,
    ReconcileResult, RouteSpec, StateReader, Subject,
};

/// Converges persisted and running network configuration of the host to
/// desired interface, route and global settings.
///
/// Every call reads the host state again, decides a [crate::Plan] and, unless
/// in dry-run mode, applies it. Concurrent reconcilers acting on the same
/// host are not coordinated.
#[derive(Debug)]
pub struct NetReconciler {
    backend: NetBackend,
    verify: bool,
}

impl NetReconciler {
    /// Reconciler using the real OS commands and kernel modules.
    pub fn new(config: &NetconvConfig) -> Result<Self, NetconvError> {
        Self::new_with_exec(config, HostExec::default())
    }

    pub fn new_with_exec(
        config: &NetconvConfig,
        exec: HostExec,
    ) -> Result<Self, NetconvError> {
        Ok(Self {
            backend: NetBackend::new(config, exec)?,
            verify: !config.no_verify,
        })
    }

    pub fn os_family(&self) -> OsFamily {
        self.backend.os_family()
    }

    pub fn backend(&self) -> &NetBackend {
        &self.backend
    }

    pub fn normalize_interface(
        &self,
        raw: RawInterface,
    ) -> Result<InterfaceSpec, NetconvError> {
        raw.normalize(self.os_family())
    }

    pub fn normalize_routes(
        &self,
        raw: RawRoutes,
    ) -> Result<RouteSpec, NetconvError> {
        raw.normalize()
    }

    pub fn normalize_global_settings(
        &self,
        raw: RawGlobalSettings,
    ) -> Result<GlobalNetworkSpec, NetconvError> {
        raw.normalize()
    }

    pub fn reconcile_interface(
        &self,
        spec: &InterfaceSpec,
        dry_run: bool,
    ) -> ReconcileResult {
        let subject = Subject::Interface(spec.name.clone());
        log::info!("Reconciling interface {spec}, dry run: {dry_run}");
        let actual = match StateReader::new(&self.backend).interface(spec) {
            Ok(a) => a,
            Err(e) => return ReconcileResult::failure(&subject, &e),
        };
        let plan = decide_interface(spec, &actual);
        log::debug!("Plan for interface {}: {plan:?}", spec.name);
        let outcome = self.applier().apply_interface(&plan, dry_run);
        ReconcileResult::from_outcome(&subject, &plan, outcome)
    }

    pub fn reconcile_routes(
        &self,
        spec: &RouteSpec,
        dry_run: bool,
    ) -> ReconcileResult {
        let subject = Subject::Routes(spec.name.clone());
        log::info!(
            "Reconciling routes of interface {}, dry run: {dry_run}",
            spec.name
        );
        let actual = match StateReader::new(&self.backend).routes(spec) {
            Ok(a) => a,
            Err(e) => return ReconcileResult::failure(&subject, &e),
        };
        let plan = decide_routes(spec, self.os_family(), &actual);
        log::debug!("Plan for routes of {}: {plan:?}", spec.name);
        let outcome = self.applier().apply_routes(&plan, dry_run);
        ReconcileResult::from_outcome(&subject, &plan, outcome)
    }

    pub fn reconcile_global_settings(
        &self,
        spec: &GlobalNetworkSpec,
        dry_run: bool,
    ) -> ReconcileResult {
        let subject = Subject::GlobalSettings;
        log::info!("Reconciling global network settings {spec}, dry run: {dry_run}");
        let actual = match StateReader::new(&self.backend).global_settings() {
            Ok(a) => a,
            Err(e) => return ReconcileResult::failure(&subject, &e),
        };
        let plan = decide_global_settings(spec, &actual);
        log::debug!("Plan for global network settings: {plan:?}");
        let outcome = self.applier().apply_global_settings(&plan, dry_run);
        ReconcileResult::from_outcome(&subject, &plan, outcome)
    }

    /// Normalize then reconcile, reporting invalid input as failed result.
    pub fn reconcile_raw_interface(
        &self,
        raw: RawInterface,
        dry_run: bool,
    ) -> ReconcileResult {
        let name = raw.name.clone().unwrap_or_default();
        match self.normalize_interface(raw) {
            Ok(spec) => self.reconcile_interface(&spec, dry_run),
            Err(e) => ReconcileResult::failure(&Subject::Interface(name), &e),
        }
    }

    pub fn reconcile_raw_routes(
        &self,
        raw: RawRoutes,
        dry_run: bool,
    ) -> ReconcileResult {
        let name = raw.name.clone().unwrap_or_default();
        match self.normalize_routes(raw) {
            Ok(spec) => self.reconcile_routes(&spec, dry_run),
            Err(e) => ReconcileResult::failure(&Subject::Routes(name), &e),
        }
    }

    pub fn reconcile_raw_global_settings(
        &self,
        raw: RawGlobalSettings,
        dry_run: bool,
    ) -> ReconcileResult {
        match self.normalize_global_settings(raw) {
            Ok(spec) => self.reconcile_global_settings(&spec, dry_run),
            Err(e) => ReconcileResult::failure(&Subject::GlobalSettings, &e),
        }
    }

    fn applier(&self) -> Applier<'_> {
        Applier::new(&self.backend, self.verify)
    }
}
