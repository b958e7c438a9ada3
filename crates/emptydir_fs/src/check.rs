//! Blocking emptiness check over `std::fs`.

use std::fs;
use std::path::Path;

use crate::report::{ReportEmptyDir, ReportEmptyDirBuilder};
use crate::spec::{EmptyDirError, SpecEmptyDirOptions};
use crate::util::{map_io_error, visit_entry};

/// Return `true` when `dir_path` holds no entry that counts as present.
///
/// An entry counts unless it is a symbolic link (with
/// `if_follow_symlinks == false`) or its name matches one of
/// `spec_options.ignore`. The listing is one level deep and stops at the
/// first counted entry.
///
/// # Errors
/// - [`EmptyDirError::NotFound`] if `dir_path` does not exist.
/// - [`EmptyDirError::PermissionDenied`] if it cannot be inspected.
/// - [`EmptyDirError::NotADirectory`] if it is not a directory.
/// - [`EmptyDirError::Io`] for any other I/O failure.
pub fn is_empty_dir_sync<P>(
    dir_path: P,
    spec_options: &SpecEmptyDirOptions,
) -> Result<bool, EmptyDirError>
where
    P: AsRef<Path>,
{
    inspect_dir_sync(dir_path, spec_options).map(|report| report.if_empty)
}

/// Same walk as [`is_empty_dir_sync`], returning the full [`ReportEmptyDir`].
pub fn inspect_dir_sync<P>(
    dir_path: P,
    spec_options: &SpecEmptyDirOptions,
) -> Result<ReportEmptyDir, EmptyDirError>
where
    P: AsRef<Path>,
{
    let path_dir = dir_path.as_ref();
    tracing::debug!(path = %path_dir.display(), "checking directory emptiness");

    let stat_dir = fs::metadata(path_dir).map_err(|e| map_io_error(e, path_dir))?;
    if !stat_dir.is_dir() {
        return Err(EmptyDirError::NotADirectory(path_dir.to_path_buf()));
    }

    let mut builder_report = ReportEmptyDirBuilder::default();
    let iter_entries = fs::read_dir(path_dir).map_err(|e| map_io_error(e, path_dir))?;
    for _entry_res in iter_entries {
        let entry = _entry_res.map_err(|e| map_io_error(e, path_dir))?;
        let cfg_file_type = entry.file_type().map_err(|e| map_io_error(e, path_dir))?;
        let c_name = entry.file_name().to_string_lossy().to_string();

        if visit_entry(c_name, cfg_file_type.is_symlink(), spec_options, &mut builder_report)
            .is_break()
        {
            break;
        }
    }

    Ok(builder_report.build())
}
