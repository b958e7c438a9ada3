//! Non-blocking emptiness check over `tokio::fs`.
//!
//! Mirrors [`crate::check`] call for call; only the I/O primitives differ.

use std::path::Path;

use crate::report::{ReportEmptyDir, ReportEmptyDirBuilder};
use crate::spec::{EmptyDirError, SpecEmptyDirOptions};
use crate::util::{map_io_error, visit_entry};

/// Async form of [`crate::is_empty_dir_sync`] with identical results.
///
/// Must be polled inside a Tokio runtime.
pub async fn is_empty_dir<P>(
    dir_path: P,
    spec_options: &SpecEmptyDirOptions,
) -> Result<bool, EmptyDirError>
where
    P: AsRef<Path>,
{
    inspect_dir(dir_path, spec_options)
        .await
        .map(|report| report.if_empty)
}

/// Async form of [`crate::inspect_dir_sync`].
pub async fn inspect_dir<P>(
    dir_path: P,
    spec_options: &SpecEmptyDirOptions,
) -> Result<ReportEmptyDir, EmptyDirError>
where
    P: AsRef<Path>,
{
    let path_dir = dir_path.as_ref();
    tracing::debug!(path = %path_dir.display(), "checking directory emptiness (async)");

    let stat_dir = tokio::fs::metadata(path_dir)
        .await
        .map_err(|e| map_io_error(e, path_dir))?;
    if !stat_dir.is_dir() {
        return Err(EmptyDirError::NotADirectory(path_dir.to_path_buf()));
    }

    let mut builder_report = ReportEmptyDirBuilder::default();
    let mut iter_entries = tokio::fs::read_dir(path_dir)
        .await
        .map_err(|e| map_io_error(e, path_dir))?;
    while let Some(entry) = iter_entries
        .next_entry()
        .await
        .map_err(|e| map_io_error(e, path_dir))?
    {
        let cfg_file_type = entry
            .file_type()
            .await
            .map_err(|e| map_io_error(e, path_dir))?;
        let c_name = entry.file_name().to_string_lossy().to_string();

        if visit_entry(c_name, cfg_file_type.is_symlink(), spec_options, &mut builder_report)
            .is_break()
        {
            break;
        }
    }

    Ok(builder_report.build())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{inspect_dir, is_empty_dir};
    use crate::check::inspect_dir_sync;
    use crate::spec::{EmptyDirError, EnumIgnorePattern, SpecEmptyDirOptions};

    #[tokio::test]
    async fn async_empty_dir_is_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(
            is_empty_dir(tmp.path(), &SpecEmptyDirOptions::default())
                .await
                .expect("check")
        );
    }

    #[tokio::test]
    async fn async_scenarios_match_blocking_form() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::write(tmp.path().join("a.tmp"), "a").expect("write");
        fs::write(tmp.path().join("b.log"), "b").expect("write");

        let l_cases = vec![
            SpecEmptyDirOptions::default(),
            SpecEmptyDirOptions::default().with_ignore(["a.tmp"]),
            SpecEmptyDirOptions::default().with_ignore([
                EnumIgnorePattern::literal("a.tmp"),
                EnumIgnorePattern::regex(r"\.log$").expect("regex"),
            ]),
            SpecEmptyDirOptions::default()
                .with_ignore([EnumIgnorePattern::predicate(|_| true)])
                .with_follow_symlinks(true),
        ];

        for spec_options in &l_cases {
            let report_async = inspect_dir(tmp.path(), spec_options).await.expect("async");
            let report_sync = inspect_dir_sync(tmp.path(), spec_options).expect("sync");
            assert_eq!(report_async.if_empty, report_sync.if_empty, "{spec_options:?}");
        }

        let report = inspect_dir(tmp.path(), &l_cases[2]).await.expect("async");
        assert!(report.if_empty);
        assert_eq!(report.cnt_ignored, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn async_check_runs_on_multi_thread_runtime() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::write(tmp.path().join("keep.txt"), "keep").expect("write");
        let path_dir = tmp.path().to_path_buf();

        let handle = tokio::spawn(async move {
            is_empty_dir(&path_dir, &SpecEmptyDirOptions::default()).await
        });
        assert!(!handle.await.expect("join").expect("check"));
    }

    #[tokio::test]
    async fn async_missing_dir_is_not_found() {
        let err = is_empty_dir("/does/not/exist", &SpecEmptyDirOptions::default())
            .await
            .expect_err("must fail");
        assert!(matches!(err, EmptyDirError::NotFound(_)));
        assert!(err.to_string().contains("/does/not/exist"));
    }

    #[tokio::test]
    async fn async_regular_file_is_not_a_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_file = tmp.path().join("file.txt");
        fs::write(&path_file, "x").expect("write");

        let err = is_empty_dir(&path_file, &SpecEmptyDirOptions::default())
            .await
            .expect_err("must fail");
        assert!(matches!(err, EmptyDirError::NotADirectory(ref p) if p == &path_file));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn async_symlink_policy() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().expect("tempdir");
        let path_dir = tmp.path().join("dir");
        fs::create_dir(&path_dir).expect("mkdir");
        symlink(tmp.path(), path_dir.join("up")).expect("symlink");

        assert!(
            is_empty_dir(&path_dir, &SpecEmptyDirOptions::default())
                .await
                .expect("check")
        );
        let spec_options = SpecEmptyDirOptions::default().with_follow_symlinks(true);
        assert!(!is_empty_dir(&path_dir, &spec_options).await.expect("check"));
    }
}
