// SPDX-License-Identifier: Apache-2.0

use std::fs::Permissions;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::{ErrorKind, NetconvError};

/// Read file content, `None` when the file does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, NetconvError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("{} does not exist", path.display());
            Ok(None)
        }
        Err(e) => Err(NetconvError::new(
            ErrorKind::ReadError,
            format!("Failed to read {}: {e}", path.display()),
        )),
    }
}

/// Stage content into a sibling temporary file then rename it over `path`,
/// so a failed write never leaves a truncated file behind. Without `mode`,
/// the permissions of the replaced file are kept.
pub(crate) fn write_atomic(
    path: &Path,
    content: &str,
    mode: Option<u32>,
) -> Result<(), NetconvError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_error(parent, e))?;
        }
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            NetconvError::new(
                ErrorKind::WriteError,
                format!("Invalid file path {}", path.display()),
            )
        })?;
    let tmp_path = path.with_file_name(format!(".{file_name}.netconv-tmp"));

    let permissions = match mode {
        Some(mode) => Some(Permissions::from_mode(mode)),
        None => std::fs::metadata(path).ok().map(|m| m.permissions()),
    };

    if let Err(e) = stage(&tmp_path, content, permissions) {
        std::fs::remove_file(&tmp_path).ok();
        return Err(e);
    }
    std::fs::rename(&tmp_path, path).map_err(|e| {
        std::fs::remove_file(&tmp_path).ok();
        write_error(path, e)
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

fn stage(
    tmp_path: &Path,
    content: &str,
    permissions: Option<Permissions>,
) -> Result<(), NetconvError> {
    let mut fd = std::fs::File::create(tmp_path)
        .map_err(|e| write_error(tmp_path, e))?;
    fd.write_all(content.as_bytes())
        .map_err(|e| write_error(tmp_path, e))?;
    if let Some(permissions) = permissions {
        fd.set_permissions(permissions)
            .map_err(|e| write_error(tmp_path, e))?;
    }
    // Content must reach the disk before the rename replaces the old file
    fd.sync_all().map_err(|e| write_error(tmp_path, e))?;
    Ok(())
}

pub(crate) fn remove_if_exists(path: &Path) -> Result<(), NetconvError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(write_error(path, e)),
    }
}

fn write_error(path: &Path, e: std::io::Error) -> NetconvError {
    NetconvError::new(
        ErrorKind::WriteError,
        format!("Failed to write {}: {e}", path.display()),
    )
}
