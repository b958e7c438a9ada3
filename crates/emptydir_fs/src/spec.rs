//! Emptiness-check specification models and top-level error types.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use globset::{Glob, GlobMatcher};
use regex::Regex;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Predicate signature accepted by [`EnumIgnorePattern::Predicate`].
pub type TypeIgnorePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One rule that removes a directory entry from the "present" set.
#[derive(Clone)]
pub enum EnumIgnorePattern {
    /// Exact filename equality.
    Literal(String),
    /// Regular expression searched anywhere in the filename.
    Regex(Regex),
    /// Shell-like wildcard matched against the whole filename.
    Glob(GlobMatcher),
    /// Caller-supplied test; `true` means ignore.
    Predicate(TypeIgnorePredicate),
}

impl EnumIgnorePattern {
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// Compile `pattern` as a regular expression.
    pub fn regex(pattern: &str) -> Result<Self, EmptyDirError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| EmptyDirError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Compile `pattern` as a glob.
    pub fn glob(pattern: &str) -> Result<Self, EmptyDirError> {
        Glob::new(pattern)
            .map(|g| Self::Glob(g.compile_matcher()))
            .map_err(|e| EmptyDirError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn predicate<F>(func: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(func))
    }

    /// Test a single filename against this pattern.
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Literal(v) => v == name,
            Self::Regex(v) => v.is_match(name),
            Self::Glob(v) => v.is_match(name),
            Self::Predicate(func) => func(name),
        }
    }
}

impl fmt::Debug for EnumIgnorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Regex(v) => f.debug_tuple("Regex").field(&v.as_str()).finish(),
            Self::Glob(v) => f.debug_tuple("Glob").field(&v.glob().glob()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for EnumIgnorePattern {
    fn from(name: &str) -> Self {
        Self::Literal(name.to_string())
    }
}

impl From<String> for EnumIgnorePattern {
    fn from(name: String) -> Self {
        Self::Literal(name)
    }
}

impl From<Regex> for EnumIgnorePattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

impl From<GlobMatcher> for EnumIgnorePattern {
    fn from(matcher: GlobMatcher) -> Self {
        Self::Glob(matcher)
    }
}

/// Interpretation of raw pattern strings for [`crate::compile_ignore_patterns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumIgnorePatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Exact string match.
    Literal,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `is_empty_dir` / `is_empty_dir_sync`.
#[derive(Debug, Clone, Default)]
pub struct SpecEmptyDirOptions {
    /// Entries whose name matches any of these are not counted.
    pub ignore: Vec<EnumIgnorePattern>,
    /// Count symbolic-link entries like any other entry.
    ///
    /// When `false`, links are treated as absent.
    pub if_follow_symlinks: bool,
}

impl SpecEmptyDirOptions {
    pub fn with_ignore<I, T>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EnumIgnorePattern>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_follow_symlinks(mut self, if_follow_symlinks: bool) -> Self {
        self.if_follow_symlinks = if_follow_symlinks;
        self
    }
}

/// Failures of one emptiness check.
#[derive(Debug, Error)]
pub enum EmptyDirError {
    /// Path does not exist.
    #[error("Directory does not exist: {}", .0.display())]
    NotFound(PathBuf),
    /// Path exists but cannot be inspected.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    /// Path exists but is not a directory.
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Raw ignore pattern failed to compile.
    #[error("Invalid ignore pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Pattern text as supplied.
        pattern: String,
        /// Compiler error text.
        reason: String,
    },
    /// Any other I/O failure, unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{EmptyDirError, EnumIgnorePattern, SpecEmptyDirOptions};

    #[test]
    fn ignore_pattern_variants_match_by_kind() {
        assert!(EnumIgnorePattern::literal("a.tmp").is_match("a.tmp"));
        assert!(!EnumIgnorePattern::literal("a.tmp").is_match("a.tmp.bak"));

        let regex = EnumIgnorePattern::regex(r"\.log$").expect("regex");
        assert!(regex.is_match("b.log"));
        assert!(!regex.is_match("b.log.gz"));

        let regex_unanchored = EnumIgnorePattern::regex("tmp").expect("regex");
        assert!(regex_unanchored.is_match("a.tmp.bak"));

        let glob = EnumIgnorePattern::glob("*.bak").expect("glob");
        assert!(glob.is_match("a.tmp.bak"));
        assert!(!glob.is_match("a.tmp"));

        let predicate = EnumIgnorePattern::predicate(|name| name.starts_with('.'));
        assert!(predicate.is_match(".DS_Store"));
        assert!(!predicate.is_match("README.md"));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let err = EnumIgnorePattern::regex("(").expect_err("must fail");
        assert!(matches!(err, EmptyDirError::InvalidPattern { ref pattern, .. } if pattern == "("));

        let err = EnumIgnorePattern::glob("[").expect_err("must fail");
        assert!(matches!(err, EmptyDirError::InvalidPattern { .. }));
    }

    #[test]
    fn options_default_and_builders() {
        let spec_options = SpecEmptyDirOptions::default();
        assert!(spec_options.ignore.is_empty());
        assert!(!spec_options.if_follow_symlinks);

        let spec_options = SpecEmptyDirOptions::default()
            .with_ignore(["a.tmp", "b.tmp"])
            .with_follow_symlinks(true);
        assert_eq!(spec_options.ignore.len(), 2);
        assert!(spec_options.if_follow_symlinks);
        assert_eq!(format!("{:?}", spec_options.ignore[0]), "Literal(\"a.tmp\")");
    }

    #[test]
    fn error_messages_carry_path() {
        let err = EmptyDirError::NotFound("/does/not/exist".into());
        assert_eq!(err.to_string(), "Directory does not exist: /does/not/exist");

        let err = EmptyDirError::PermissionDenied("/root/secret".into());
        assert_eq!(err.to_string(), "Permission denied: /root/secret");

        let err = EmptyDirError::NotADirectory("/etc/hosts".into());
        assert_eq!(err.to_string(), "Path is not a directory: /etc/hosts");
    }
}
