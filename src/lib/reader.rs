// SPDX-License-Identifier: Apache-2.0

use crate::{
    ActualGlobalSettings, ActualInterfaceState, ActualRoutes, InterfaceSpec,
    NetBackend, NetconvError, RouteSpec,
};

/// Produces the actual state matching a desired one. Nothing is cached,
/// every call reads the host again.
#[derive(Debug, Clone, Copy)]
pub struct StateReader<'a> {
    backend: &'a NetBackend,
}

impl<'a> StateReader<'a> {
    pub fn new(backend: &'a NetBackend) -> Self {
        Self { backend }
    }

    pub fn interface(
        &self,
        desired: &InterfaceSpec,
    ) -> Result<ActualInterfaceState, NetconvError> {
        let actual = self.backend.read_interface(&desired.name)?;
        match actual.as_option() {
            Some(cur) => log::debug!("Current interface {cur}"),
            None => log::debug!("Interface {} not configured", desired.name),
        }
        Ok(actual)
    }

    pub fn routes(
        &self,
        desired: &RouteSpec,
    ) -> Result<ActualRoutes, NetconvError> {
        let actual = self.backend.read_routes(&desired.name)?;
        match actual.as_option() {
            Some(rts) => log::debug!(
                "Current routes of {}: {}",
                desired.name,
                rts.iter()
                    .map(|r| r.describe())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            None => log::debug!("No routes configured for {}", desired.name),
        }
        Ok(actual)
    }

    pub fn global_settings(&self) -> Result<ActualGlobalSettings, NetconvError> {
        let actual = self.backend.read_global_settings()?;
        match actual.as_option() {
            Some(cur) => log::debug!("Current global network settings {cur}"),
            None => log::debug!("No global network settings configured"),
        }
        Ok(actual)
    }
}
