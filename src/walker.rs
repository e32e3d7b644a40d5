//! Recursive folder sorting.
//!
//! The walk is depth first and post-order: a subdirectory's entries are
//! handled before the subdirectory itself is checked for emptiness and
//! removed. Every file is gathered into the category folders of the root the
//! run started from, not into category folders next to them; that is what
//! lets a nested folder empty out and be pruned. Directories named like a
//! category are output of an earlier run and are left alone, which makes a
//! second run a no-op.

use crate::archive::{ArchiveExpander, ArchiveExtractor, ExpandOutcome, Extractor};
use crate::file_category::{Category, classify, extension_of};
use crate::file_organizer::{
    CollisionPolicy, FileOrganizer, MoveOutcome, OrganizeError, OrganizeResult,
};
use crate::report::SortReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Knobs for a sort run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub on_collision: CollisionPolicy,
    /// Canonical path of a file the walk must leave where it is, such as
    /// the configuration file the run was started with.
    pub preserve: Option<PathBuf>,
}

/// Sorts `root` with the default archive extractor.
///
/// # Errors
///
/// Returns [`OrganizeError::NotADirectory`] before touching anything if
/// `root` is not an existing directory. Any filesystem failure other than an
/// unreadable archive aborts the run.
///
/// # Examples
///
/// ```no_run
/// use sortfolder::walker::{SortOptions, sort_folder};
/// use std::path::Path;
///
/// let report = sort_folder(Path::new("/home/me/Downloads"), &SortOptions::default()).unwrap();
/// println!("relocated {} entries", report.total_relocated());
/// ```
pub fn sort_folder(root: &Path, options: &SortOptions) -> OrganizeResult<SortReport> {
    Sorter::new(root, options.clone(), &ArchiveExtractor).run()
}

/// Walks one root and accumulates a [`SortReport`].
pub struct Sorter<'a> {
    root: PathBuf,
    options: SortOptions,
    expander: ArchiveExpander<'a>,
    report: SortReport,
}

impl<'a> Sorter<'a> {
    pub fn new(root: &Path, options: SortOptions, extractor: &'a dyn Extractor) -> Self {
        Self {
            root: root.to_path_buf(),
            options,
            expander: ArchiveExpander::new(extractor),
            report: SortReport::new(root),
        }
    }

    /// Validates the root, walks it and returns the finished report.
    pub fn run(mut self) -> OrganizeResult<SortReport> {
        if !self.root.is_dir() {
            return Err(OrganizeError::NotADirectory { path: self.root });
        }

        info!(root = %self.root.display(), "sorting folder");
        let root = self.root.clone();
        self.walk(&root)?;
        self.report.finish();
        info!(
            relocated = self.report.total_relocated(),
            failed_archives = self.report.failed_archives.len(),
            skipped = self.report.skipped.len(),
            "sorting finished"
        );
        Ok(self.report)
    }

    /// Handles every entry of `directory`, recursing into subdirectories.
    pub fn walk(&mut self, directory: &Path) -> OrganizeResult<()> {
        debug!(dir = %directory.display(), "entering directory");

        for (path, is_dir) in read_entries(directory)? {
            if !is_dir {
                if self.is_preserved(&path) {
                    debug!(path = %path.display(), "leaving preserved file in place");
                } else {
                    self.handle_file(&path)?;
                }
                continue;
            }

            let reserved = path
                .file_name()
                .is_some_and(|name| Category::is_reserved_dir_name(&name.to_string_lossy()));
            if reserved {
                debug!(dir = %path.display(), "skipping category folder");
                continue;
            }

            self.walk(&path)?;
            if is_empty_dir(&path)? {
                fs::remove_dir(&path).map_err(|e| OrganizeError::RemovalFailed {
                    path: path.clone(),
                    source: e,
                })?;
                debug!(dir = %path.display(), "removed empty directory");
            }
        }
        Ok(())
    }

    fn is_preserved(&self, path: &Path) -> bool {
        self.options
            .preserve
            .as_deref()
            .is_some_and(|kept| fs::canonicalize(path).is_ok_and(|p| p == kept))
    }

    fn handle_file(&mut self, path: &Path) -> OrganizeResult<()> {
        let ext = extension_of(path);
        let category = classify(&ext);
        let destination = self.root.join(category.dir_name());

        if category == Category::Archives {
            match self.expander.expand(path, &destination)? {
                ExpandOutcome::Extracted(folder) => self.report.record_file(category, folder),
                ExpandOutcome::Invalid { reason } => {
                    self.report.record_failed_archive(path.to_path_buf(), reason)
                }
            }
        } else {
            match FileOrganizer::move_to_category(path, &destination, self.options.on_collision)? {
                MoveOutcome::Moved(new_path) => self.report.record_file(category, new_path),
                MoveOutcome::Skipped => self.report.record_skipped(path.to_path_buf()),
            }
        }

        self.report.record_extension(&ext, category);
        Ok(())
    }
}

/// Lists `directory` sorted by file name, flagging real directories.
///
/// Symlinks are not followed, so a link to a directory counts as a file.
fn read_entries(directory: &Path) -> OrganizeResult<Vec<(PathBuf, bool)>> {
    let read_err = |e: std::io::Error| OrganizeError::ReadDirFailed {
        path: directory.to_path_buf(),
        source: e,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_dir = entry.file_type().map_err(read_err)?.is_dir();
        entries.push((entry.path(), is_dir));
    }
    entries.sort();
    Ok(entries)
}

fn is_empty_dir(path: &Path) -> OrganizeResult<bool> {
    let mut entries = fs::read_dir(path).map_err(|e| OrganizeError::ReadDirFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ExtractError;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Writes a marker file instead of extracting, remembering what it saw.
    #[derive(Default)]
    struct RecordingExtractor {
        seen: RefCell<Vec<PathBuf>>,
    }

    impl Extractor for RecordingExtractor {
        fn extract(&self, archive: &Path, destination: &Path) -> Result<(), ExtractError> {
            self.seen.borrow_mut().push(archive.to_path_buf());
            fs::write(destination.join("extracted.txt"), "ok")?;
            Ok(())
        }
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_run_rejects_non_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = sort_folder(&file, &SortOptions::default());
        assert!(matches!(result, Err(OrganizeError::NotADirectory { .. })));
        assert!(file.exists());

        let missing = sort_folder(&temp.path().join("missing"), &SortOptions::default());
        assert!(matches!(missing, Err(OrganizeError::NotADirectory { .. })));
    }

    #[test]
    fn test_files_go_to_root_categories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.png");
        touch(temp.path(), "deep/er/b.MP3");

        let report = sort_folder(temp.path(), &SortOptions::default()).unwrap();

        assert!(temp.path().join("images/a.png").is_file());
        assert!(temp.path().join("audio/b.MP3").is_file());
        assert!(!temp.path().join("deep").exists());
        assert_eq!(report.files_in(Category::Audio).len(), 1);
        assert!(report.known_extensions.contains("MP3"));
    }

    #[test]
    fn test_archives_use_extractor_and_record_folder() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "sub/Архив.zip");
        let extractor = RecordingExtractor::default();

        let report = Sorter::new(temp.path(), SortOptions::default(), &extractor)
            .run()
            .unwrap();

        let folder = temp.path().join("archives/Arhiv");
        assert_eq!(report.files_in(Category::Archives), [folder.clone()]);
        assert!(folder.join("extracted.txt").is_file());
        assert_eq!(extractor.seen.borrow().len(), 1);
        assert!(!temp.path().join("sub").exists());
    }

    #[test]
    fn test_reserved_folders_are_not_entered() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "images/already.txt");
        touch(temp.path(), "old/others/stay.png");

        let report = sort_folder(temp.path(), &SortOptions::default()).unwrap();

        assert!(temp.path().join("images/already.txt").is_file());
        assert!(temp.path().join("old/others/stay.png").is_file());
        assert_eq!(report.total_relocated(), 0);
    }

    #[test]
    fn test_skipped_file_keeps_its_folder() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "audio/song.mp3");
        touch(temp.path(), "inbox/song.mp3");
        let options = SortOptions {
            on_collision: CollisionPolicy::Skip,
            ..SortOptions::default()
        };

        let report = sort_folder(temp.path(), &options).unwrap();

        assert_eq!(report.skipped, [temp.path().join("inbox/song.mp3")]);
        assert!(temp.path().join("inbox/song.mp3").is_file());
        assert!(report.known_extensions.contains("MP3"));
    }

    #[test]
    fn test_entries_are_processed_in_name_order() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.txt");
        touch(temp.path(), "a.txt");
        touch(temp.path(), "c.txt");

        let report = sort_folder(temp.path(), &SortOptions::default()).unwrap();

        let names: Vec<_> = report
            .files_in(Category::Documents)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_preserved_file_stays_at_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".sortfolder.toml");
        touch(temp.path(), "z.png");
        let options = SortOptions {
            preserve: Some(fs::canonicalize(temp.path().join(".sortfolder.toml")).unwrap()),
            ..SortOptions::default()
        };

        let report = sort_folder(temp.path(), &options).unwrap();

        assert!(temp.path().join(".sortfolder.toml").is_file());
        assert!(!temp.path().join("others").exists());
        assert!(temp.path().join("images/z.png").is_file());
        assert!(report.unknown_extensions.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_moved_not_followed() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "keep.png");
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        sort_folder(temp.path(), &SortOptions::default()).unwrap();

        assert!(outside.path().join("keep.png").is_file());
        assert!(
            fs::symlink_metadata(temp.path().join("others/link"))
                .unwrap()
                .file_type()
                .is_symlink()
        );
    }
}
