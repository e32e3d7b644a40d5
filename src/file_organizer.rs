//! Moving files into category directories.
//!
//! Handles destination directory creation, name normalization and what to
//! do when the normalized name is already taken.

use crate::normalize::normalize;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that abort a sort run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root passed to a run is not an existing directory.
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    /// Failed to create a category or extraction directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to list a directory during the walk.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// Failed to delete an emptied directory, an extracted archive, or a
    /// leftover extraction folder.
    #[error("Failed to remove {}: {source}", path.display())]
    RemovalFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Extraction hit an I/O error that is not a format problem.
    #[error("Failed to extract archive {}: {source}", path.display())]
    ArchiveFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What to do when the destination name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Append `_1`, `_2`, ... to the stem until the name is free.
    Rename,
    /// Leave the source file where it is.
    Skip,
}

/// Result of a single move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// The destination existed and the policy was `Skip`.
    Skipped,
}

/// Creates `path` and any missing parents. Existing directories are fine.
pub(crate) fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Moves single files into category directories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves `file_path` into `destination_dir` under a normalized name.
    ///
    /// The stem is normalized; the suffix is kept exactly as it was. The
    /// destination directory is created if needed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortfolder::file_organizer::{CollisionPolicy, FileOrganizer, MoveOutcome};
    /// use std::path::Path;
    ///
    /// let outcome = FileOrganizer::move_to_category(
    ///     Path::new("/tmp/inbox/Фото.png"),
    ///     Path::new("/tmp/inbox/images"),
    ///     CollisionPolicy::Overwrite,
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     outcome,
    ///     MoveOutcome::Moved(Path::new("/tmp/inbox/images/Foto.png").to_path_buf())
    /// );
    /// ```
    pub fn move_to_category(
        file_path: &Path,
        destination_dir: &Path,
        policy: CollisionPolicy,
    ) -> OrganizeResult<MoveOutcome> {
        ensure_dir(destination_dir)?;

        let (stem, suffix) = split_file_name(file_path);
        let stem = normalize(&stem);
        let mut destination_path = destination_dir.join(format!("{stem}{suffix}"));

        if fs::symlink_metadata(&destination_path).is_ok() {
            match policy {
                CollisionPolicy::Overwrite => {
                    debug!(path = %destination_path.display(), "overwriting existing file");
                }
                CollisionPolicy::Rename => {
                    destination_path = Self::free_name(destination_dir, &stem, &suffix);
                }
                CollisionPolicy::Skip => {
                    debug!(file = %file_path.display(), "destination taken, skipping");
                    return Ok(MoveOutcome::Skipped);
                }
            }
        }

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            source: e,
        })?;

        debug!(
            from = %file_path.display(),
            to = %destination_path.display(),
            "moved file"
        );
        Ok(MoveOutcome::Moved(destination_path))
    }

    /// First `stem_N{suffix}` in `dir` that does not exist yet.
    fn free_name(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
        (1u64..)
            .map(|n| dir.join(format!("{stem}_{n}{suffix}")))
            .find(|candidate| fs::symlink_metadata(candidate).is_err())
            .unwrap_or_else(|| dir.join(format!("{stem}{suffix}")))
    }
}

/// Splits a file name into its raw stem and its suffix including the dot.
///
/// `photo.tar.gz` gives `("photo.tar", ".gz")`, `.bashrc` gives
/// `(".bashrc", "")`.
pub(crate) fn split_file_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    (stem, suffix)
}
