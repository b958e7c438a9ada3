//! Inspection report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Outcome and counters for one `inspect_dir` run.
///
/// Counters stop at the entry that decided the result, so they describe
/// the scanned prefix of the listing rather than the whole directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportEmptyDir {
    /// `true` when no counted, non-ignored entry was found.
    pub if_empty: bool,
    /// Entries read from the listing.
    pub cnt_scanned: u64,
    /// Symbolic links treated as absent.
    pub cnt_skipped_symlinks: u64,
    /// Entries matched by an ignore pattern.
    pub cnt_ignored: u64,
    /// Name of the entry that made the directory non-empty.
    pub name_first_present: Option<String>,
}

impl ReportEmptyDir {
    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert(
            "cnt_skipped_symlinks".to_string(),
            self.cnt_skipped_symlinks,
        );
        dict_counts.insert("cnt_ignored".to_string(), self.cnt_ignored);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let mut txt = format!(
            "{prefix} empty={} scanned={} skipped_symlinks={} ignored={}",
            self.if_empty, self.cnt_scanned, self.cnt_skipped_symlinks, self.cnt_ignored
        );
        if let Some(name) = &self.name_first_present {
            txt.push_str(&format!(" first_present={name}"));
        }
        txt
    }
}

impl fmt::Display for ReportEmptyDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[EMPTY]"))
    }
}

/// Mutable accumulator shared by the blocking and async walks.
#[derive(Debug, Default, Clone)]
pub(crate) struct ReportEmptyDirBuilder {
    cnt_scanned: u64,
    cnt_skipped_symlinks: u64,
    cnt_ignored: u64,
    name_first_present: Option<String>,
}

impl ReportEmptyDirBuilder {
    pub(crate) fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub(crate) fn add_skipped_symlink(&mut self) {
        self.cnt_skipped_symlinks += 1;
    }

    pub(crate) fn add_ignored(&mut self) {
        self.cnt_ignored += 1;
    }

    pub(crate) fn set_first_present(&mut self, name: String) {
        self.name_first_present = Some(name);
    }

    /// Finalize builder into immutable report.
    pub(crate) fn build(self) -> ReportEmptyDir {
        ReportEmptyDir {
            if_empty: self.name_first_present.is_none(),
            cnt_scanned: self.cnt_scanned,
            cnt_skipped_symlinks: self.cnt_skipped_symlinks,
            cnt_ignored: self.cnt_ignored,
            name_first_present: self.name_first_present,
        }
    }
}
