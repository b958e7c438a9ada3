use std::io;
use std::ops::ControlFlow;
use std::path::Path;

use crate::report::ReportEmptyDirBuilder;
use crate::spec::{EmptyDirError, EnumIgnorePattern, EnumIgnorePatternMode, SpecEmptyDirOptions};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

/// Compile raw pattern strings into ignore patterns of one kind.
///
/// # Errors
/// Returns [`EmptyDirError::InvalidPattern`] for the first pattern that does
/// not compile under `rule_pattern`.
pub fn compile_ignore_patterns(
    patterns: &[String],
    rule_pattern: EnumIgnorePatternMode,
) -> Result<Vec<EnumIgnorePattern>, EmptyDirError> {
    patterns
        .iter()
        .map(|pattern| match rule_pattern {
            EnumIgnorePatternMode::Literal => Ok(EnumIgnorePattern::literal(pattern.as_str())),
            EnumIgnorePatternMode::Glob => EnumIgnorePattern::glob(pattern),
            EnumIgnorePatternMode::Regex => EnumIgnorePattern::regex(pattern),
        })
        .collect()
}

/// `true` when `name` matches at least one pattern.
///
/// Patterns are tested in order and the first match wins; an empty slice
/// ignores nothing.
pub fn should_ignore(name: &str, patterns: &[EnumIgnorePattern]) -> bool {
    patterns.iter().any(|p| p.is_match(name))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EntryFilter

/// Account for one listing entry; `Break` once the directory is known to be
/// non-empty.
pub(crate) fn visit_entry(
    name: String,
    if_is_symlink: bool,
    spec_options: &SpecEmptyDirOptions,
    builder_report: &mut ReportEmptyDirBuilder,
) -> ControlFlow<()> {
    builder_report.add_scanned();

    if if_is_symlink && !spec_options.if_follow_symlinks {
        tracing::trace!(name = %name, "skipping symlink entry");
        builder_report.add_skipped_symlink();
        return ControlFlow::Continue(());
    }

    if should_ignore(&name, &spec_options.ignore) {
        tracing::trace!(name = %name, "ignoring entry");
        builder_report.add_ignored();
        return ControlFlow::Continue(());
    }

    tracing::debug!(name = %name, "found present entry");
    builder_report.set_first_present(name);
    ControlFlow::Break(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ErrorMapping

pub(crate) fn map_io_error(e: io::Error, path_dir: &Path) -> EmptyDirError {
    match e.kind() {
        io::ErrorKind::NotFound => EmptyDirError::NotFound(path_dir.to_path_buf()),
        io::ErrorKind::PermissionDenied => EmptyDirError::PermissionDenied(path_dir.to_path_buf()),
        _ => EmptyDirError::Io(e),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
