// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, JsonDisplay, NetconvError};

#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonDisplay,
)]
#[non_exhaustive]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    pub fn success() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Facility executing OS commands on behalf of the backends.
pub trait CommandRunner {
    /// Run `program` with `args` to completion. Only failure to spawn is an
    /// error, non-zero exit code is reported in [CommandOutput].
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, NetconvError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, NetconvError> {
        log::debug!("Running command: {program} {}", args.join(" "));
        let output =
            std::process::Command::new(program)
                .args(args)
                .output()
                .map_err(|e| {
                    NetconvError::new(
                        ErrorKind::CommandError,
                        format!("Failed to execute {program}: {e}"),
                    )
                })?;
        Ok(CommandOutput {
            // Killed by signal has no exit code
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Facility checking and loading kernel modules.
pub trait KernelModules {
    fn is_loaded(&self, name: &str) -> Result<bool, NetconvError>;
    fn load(&self, name: &str) -> Result<(), NetconvError>;
}

#[derive(Debug, Clone)]
pub struct SystemKernelModules {
    proc_modules: PathBuf,
}

impl Default for SystemKernelModules {
    fn default() -> Self {
        Self {
            proc_modules: PathBuf::from("/proc/modules"),
        }
    }
}

impl KernelModules for SystemKernelModules {
    fn is_loaded(&self, name: &str) -> Result<bool, NetconvError> {
        let content =
            std::fs::read_to_string(&self.proc_modules).map_err(|e| {
                NetconvError::new(
                    ErrorKind::ReadError,
                    format!(
                        "Failed to read {}: {e}",
                        self.proc_modules.display()
                    ),
                )
            })?;
        Ok(content
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .any(|m| m == name))
    }

    fn load(&self, name: &str) -> Result<(), NetconvError> {
        let output = SystemCommandRunner.run("modprobe", &[name])?;
        check_output("modprobe", &[name], output).map(|_| ())
    }
}

/// OS primitives shared by all backends.
pub struct HostExec {
    runner: Box<dyn CommandRunner>,
    modules: Box<dyn KernelModules>,
}

impl Default for HostExec {
    fn default() -> Self {
        Self::new(
            Box::new(SystemCommandRunner),
            Box::new(SystemKernelModules::default()),
        )
    }
}

impl std::fmt::Debug for HostExec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostExec").finish_non_exhaustive()
    }
}

impl HostExec {
    pub fn new(
        runner: Box<dyn CommandRunner>,
        modules: Box<dyn KernelModules>,
    ) -> Self {
        Self { runner, modules }
    }

    /// Run command and treat non-zero exit code as
    /// [ErrorKind::CommandError].
    pub(crate) fn run_checked(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, NetconvError> {
        let output = self.runner.run(program, args)?;
        check_output(program, args, output)
    }

    pub(crate) fn ensure_module(&self, name: &str) -> Result<(), NetconvError> {
        if self.modules.is_loaded(name)? {
            return Ok(());
        }
        log::info!("Loading kernel module {name}");
        self.modules.load(name)
    }

    pub(crate) fn ifup(&self, iface_name: &str) -> Result<(), NetconvError> {
        self.run_checked("ifup", &[iface_name]).map(|_| ())
    }

    pub(crate) fn ifdown(&self, iface_name: &str) -> Result<(), NetconvError> {
        self.run_checked("ifdown", &[iface_name]).map(|_| ())
    }

    pub(crate) fn set_hostname(&self, hostname: &str) -> Result<(), NetconvError> {
        self.run_checked("hostname", &[hostname]).map(|_| ())
    }
}

fn check_output(
    program: &str,
    args: &[&str],
    output: CommandOutput,
) -> Result<CommandOutput, NetconvError> {
    if output.is_success() {
        Ok(output)
    } else {
        let e = NetconvError::new(
            ErrorKind::CommandError,
            format!(
                "Command `{program} {}` failed with exit code {}, \
                 stdout: {:?}, stderr: {:?}",
                args.join(" "),
                output.exit_code,
                output.stdout.trim(),
                output.stderr.trim()
            ),
        );
        log::error!("{e}");
        Err(e)
    }
}
