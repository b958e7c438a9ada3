//! `emptydir_fs` v1:
//! Rust-side directory emptiness checks.
//!
//! A directory is empty when every entry is either a symbolic link (unless
//! links are followed) or matched by an ignore pattern.
//!
//! Modules:
//! - `check`       : blocking check over `std::fs`
//! - `check_async` : non-blocking check over `tokio::fs`
//! - `spec`        : patterns/options/errors
//! - `report`      : inspection report model
//! - `util`        : pattern matching, entry filter, error mapping

pub mod check;
pub mod check_async;
pub mod report;
pub mod spec;
mod util;

pub use check::{inspect_dir_sync, is_empty_dir_sync};
pub use check_async::{inspect_dir, is_empty_dir};
pub use report::ReportEmptyDir;
pub use spec::{
    EmptyDirError, EnumIgnorePattern, EnumIgnorePatternMode, SpecEmptyDirOptions,
    TypeIgnorePredicate,
};
pub use util::{compile_ignore_patterns, should_ignore};
