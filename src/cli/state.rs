// SPDX-License-Identifier: Apache-2.0

use std::io::Read;

use serde::de::DeserializeOwned;

use super::CliError;

/// Load a desired state document from file, `-` means stdin.
pub(crate) fn state_from_file<T>(file_path: &str) -> Result<T, CliError>
where
    T: DeserializeOwned,
{
    if file_path == "-" {
        state_from_fd(&mut std::io::stdin())
    } else {
        state_from_fd(&mut std::fs::File::open(file_path)?)
    }
}

fn state_from_fd<R, T>(fd: &mut R) -> Result<T, CliError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut content = String::new();
    fd.read_to_string(&mut content)?;
    // Replace non-breaking space '\u{A0}' to normal space
    let content = content.replace('\u{A0}', " ");

    Ok(serde_yaml::from_str::<T>(&content)?)
}
