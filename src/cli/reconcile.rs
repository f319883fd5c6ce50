// SPDX-License-Identifier: Apache-2.0

use netconverge::{
    NetReconciler, RawGlobalSettings, RawInterface, RawRoutes,
    ReconcileResult,
};

use super::{state::state_from_file, CliError};

fn add_state_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        clap::Arg::new("STATE_FILE")
            .required(false)
            .index(1)
            .default_value("-")
            .help("Desired state file, `-` for stdin"),
    )
    .arg(
        clap::Arg::new("TEST")
            .long("test")
            .short('t')
            .action(clap::ArgAction::SetTrue)
            .help("Only report what would change"),
    )
}

fn state_file(matches: &clap::ArgMatches) -> &str {
    matches
        .get_one::<String>("STATE_FILE")
        .map(String::as_str)
        .unwrap_or("-")
}

/// Print the result and tell whether it failed.
fn report(result: &ReconcileResult) -> Result<bool, CliError> {
    print!("{}", serde_yaml::to_string(result)?);
    Ok(!result.is_failure())
}

pub(crate) struct CommandInterface;

impl CommandInterface {
    pub(crate) const CMD: &'static str = "interface";

    pub(crate) fn new_cmd() -> clap::Command {
        add_state_args(
            clap::Command::new(Self::CMD)
                .alias("i")
                .about("Converge configuration of a network interface"),
        )
    }

    pub(crate) fn handle(
        matches: &clap::ArgMatches,
        reconciler: &NetReconciler,
    ) -> Result<bool, CliError> {
        let raw: RawInterface = state_from_file(state_file(matches))?;
        report(
            &reconciler.reconcile_raw_interface(raw, matches.get_flag("TEST")),
        )
    }
}

pub(crate) struct CommandRoutes;

impl CommandRoutes {
    pub(crate) const CMD: &'static str = "routes";

    pub(crate) fn new_cmd() -> clap::Command {
        add_state_args(
            clap::Command::new(Self::CMD)
                .alias("r")
                .about("Converge static routes of a network interface"),
        )
    }

    pub(crate) fn handle(
        matches: &clap::ArgMatches,
        reconciler: &NetReconciler,
    ) -> Result<bool, CliError> {
        let raw: RawRoutes = state_from_file(state_file(matches))?;
        report(&reconciler.reconcile_raw_routes(raw, matches.get_flag("TEST")))
    }
}

pub(crate) struct CommandSystem;

impl CommandSystem {
    pub(crate) const CMD: &'static str = "system";

    pub(crate) fn new_cmd() -> clap::Command {
        add_state_args(
            clap::Command::new(Self::CMD)
                .alias("sys")
                .about("Converge global network settings and hostname"),
        )
    }

    pub(crate) fn handle(
        matches: &clap::ArgMatches,
        reconciler: &NetReconciler,
    ) -> Result<bool, CliError> {
        let raw: RawGlobalSettings = state_from_file(state_file(matches))?;
        report(
            &reconciler
                .reconcile_raw_global_settings(raw, matches.get_flag("TEST")),
        )
    }
}
