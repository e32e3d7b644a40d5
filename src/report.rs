//! Per-run results.
//!
//! A [`SortReport`] starts empty, is filled in while the walker runs and is
//! handed over once at the end. It is never written to disk by the library;
//! the CLI can print it or dump it as JSON.

use crate::file_category::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// An archive that could not be extracted and was left where it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedArchive {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a sort run did.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    /// Directory the run started from.
    pub root: PathBuf,
    /// Set by [`SortReport::finish`].
    pub finished_at: Option<DateTime<Utc>>,
    /// New locations, per category. Archives list extraction folders.
    pub files: BTreeMap<Category, Vec<PathBuf>>,
    /// Extensions found in the category table.
    pub known_extensions: BTreeSet<String>,
    /// Extensions routed to `others`.
    pub unknown_extensions: BTreeSet<String>,
    pub failed_archives: Vec<FailedArchive>,
    /// Files left in place because their destination name was taken.
    pub skipped: Vec<PathBuf>,
}

impl SortReport {
    /// Creates an empty report with an empty list for every category.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            finished_at: None,
            files: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
            known_extensions: BTreeSet::new(),
            unknown_extensions: BTreeSet::new(),
            failed_archives: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_file(&mut self, category: Category, path: PathBuf) {
        self.files.entry(category).or_default().push(path);
    }

    /// Files the table has no bucket for are recorded as unknown.
    pub fn record_extension(&mut self, ext: &str, category: Category) {
        if category.is_known() {
            self.known_extensions.insert(ext.to_string());
        } else {
            self.unknown_extensions.insert(ext.to_string());
        }
    }

    pub fn record_failed_archive(&mut self, path: PathBuf, reason: String) {
        self.failed_archives.push(FailedArchive { path, reason });
    }

    pub fn record_skipped(&mut self, path: PathBuf) {
        self.skipped.push(path);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Relocated entries for one category.
    pub fn files_in(&self, category: Category) -> &[PathBuf] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of relocated entries across all categories.
    pub fn total_relocated(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}
