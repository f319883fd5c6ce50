// SPDX-License-Identifier: Apache-2.0

use netconverge::NetReconciler;

use crate::CliError;

pub(crate) struct CommandShow;

impl CommandShow {
    pub(crate) const CMD: &'static str = "show";

    pub(crate) fn new_cmd() -> clap::Command {
        clap::Command::new(Self::CMD)
            .alias("s")
            .about("Show persisted network configuration")
            .subcommand_required(true)
            .subcommand(
                clap::Command::new("interface")
                    .about("Show persisted configuration of an interface")
                    .arg(clap::Arg::new("NAME").required(true).index(1)),
            )
            .subcommand(
                clap::Command::new("routes")
                    .about("Show persisted routes of an interface")
                    .arg(clap::Arg::new("NAME").required(true).index(1)),
            )
            .subcommand(
                clap::Command::new("system")
                    .about("Show persisted global network settings"),
            )
    }

    pub(crate) fn handle(
        matches: &clap::ArgMatches,
        reconciler: &NetReconciler,
    ) -> Result<(), CliError> {
        let backend = reconciler.backend();
        // Nothing persisted is shown as YAML null
        let output = match matches.subcommand() {
            Some(("interface", sub)) => {
                let state = backend.read_interface(name_arg(sub)?)?;
                serde_yaml::to_string(&state.as_option())?
            }
            Some(("routes", sub)) => {
                let state = backend.read_routes(name_arg(sub)?)?;
                serde_yaml::to_string(&state.as_option())?
            }
            Some(("system", _)) => {
                let state = backend.read_global_settings()?;
                serde_yaml::to_string(&state.as_option())?
            }
            _ => return Err(CliError::from("Unknown show command")),
        };
        print!("{output}");
        Ok(())
    }
}

fn name_arg(matches: &clap::ArgMatches) -> Result<&str, CliError> {
    matches
        .get_one::<String>("NAME")
        .map(String::as_str)
        .ok_or_else(|| CliError::from("Missing interface name"))
}
