// SPDX-License-Identifier: Apache-2.0

mod config;
mod error;
mod reconcile;
mod show;
mod state;

use netconverge::{NetReconciler, NetconvLogLevel};

pub(crate) use self::error::CliError;
use self::{
    config::{load_config, new_config_args},
    reconcile::{CommandInterface, CommandRoutes, CommandSystem},
    show::CommandShow,
};

fn main() {
    let mut cli_cmd = clap::Command::new("ncv")
        .about("Converge host network configuration to desired state")
        .version(clap::crate_version!())
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            clap::Arg::new("quiet")
                .short('q')
                .action(clap::ArgAction::SetTrue)
                .help("Disable logging")
                .global(true),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .action(clap::ArgAction::Count)
                .help("Increase verbose level")
                .global(true),
        )
        .args(new_config_args())
        .subcommand(CommandInterface::new_cmd())
        .subcommand(CommandRoutes::new_cmd())
        .subcommand(CommandSystem::new_cmd())
        .subcommand(CommandShow::new_cmd());

    let matches = cli_cmd.get_matches_mut();

    match run(&matches) {
        Ok(true) => (),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn init_logger(matches: &clap::ArgMatches, level: NetconvLogLevel) {
    if matches.get_flag("quiet") {
        return;
    }
    let verbose = matches.get_count("verbose");
    let log_level: log::LevelFilter = level.raised_by(verbose).into();
    let mut log_builder = env_logger::Builder::new();
    if verbose >= 3 {
        log_builder.filter(None, log_level);
    } else {
        for log_group in ["netconverge", "ncv"] {
            log_builder.filter(Some(log_group), log_level);
        }
    }
    log_builder.init();
}

/// Returns false when reconciliation failed.
fn run(matches: &clap::ArgMatches) -> Result<bool, CliError> {
    let config = load_config(matches)?;
    init_logger(matches, config.log_level.unwrap_or_default());
    log::debug!("ncv version: {}", clap::crate_version!());
    log::debug!("Using config {config}");

    let reconciler = NetReconciler::new(&config)?;

    match matches.subcommand() {
        Some((CommandInterface::CMD, sub)) => {
            CommandInterface::handle(sub, &reconciler)
        }
        Some((CommandRoutes::CMD, sub)) => {
            CommandRoutes::handle(sub, &reconciler)
        }
        Some((CommandSystem::CMD, sub)) => {
            CommandSystem::handle(sub, &reconciler)
        }
        Some((CommandShow::CMD, sub)) => {
            CommandShow::handle(sub, &reconciler).map(|()| true)
        }
        _ => Err(CliError::from("Unknown command")),
    }
}
