// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use netconverge::{NetconvConfig, OsFamily};

use super::CliError;

const OS_RELEASE_PATH: &str = "/etc/os-release";

pub(crate) fn new_config_args() -> Vec<clap::Arg> {
    vec![
        clap::Arg::new("CONFIG")
            .long("config")
            .short('c')
            .help("Configuration file")
            .global(true),
        clap::Arg::new("OS_FAMILY")
            .long("os-family")
            .value_parser(["debian", "rhel"])
            .help("Network configuration dialect, detected when omitted")
            .global(true),
        clap::Arg::new("ROOT")
            .long("root")
            .help("Prefix prepended to every configuration path")
            .global(true),
        clap::Arg::new("NO_VERIFY")
            .long("no-verify")
            .action(clap::ArgAction::SetTrue)
            .help("Do not re-read the persisted configuration after applying")
            .global(true),
    ]
}

/// Configuration file overridden by command line arguments.
pub(crate) fn load_config(
    matches: &clap::ArgMatches,
) -> Result<NetconvConfig, CliError> {
    let mut config = match matches.get_one::<String>("CONFIG") {
        Some(path) => NetconvConfig::from_file(Path::new(path))?,
        None => NetconvConfig::default(),
    };
    match matches.get_one::<String>("OS_FAMILY").map(String::as_str) {
        Some("debian") => config.os_family = Some(OsFamily::Debian),
        Some("rhel") => config.os_family = Some(OsFamily::Rhel),
        _ => (),
    }
    if let Some(root) = matches.get_one::<String>("ROOT") {
        config.root = root.into();
    }
    if matches.get_flag("NO_VERIFY") {
        config.no_verify = true;
    }
    if config.os_family.is_none() {
        config.os_family = detect_os_family(&config.rooted(Path::new(
            OS_RELEASE_PATH,
        )));
    }
    Ok(config)
}

fn detect_os_family(os_release: &Path) -> Option<OsFamily> {
    let content = std::fs::read_to_string(os_release).ok()?;
    OsFamily::from_os_release(&content)
}
