//! Archive extraction.
//!
//! [`ArchiveExpander`] owns the filesystem bookkeeping around an extraction
//! (destination folder, removing the original, cleaning up after a bad
//! archive). The extraction itself sits behind the [`Extractor`] trait so the
//! walker can be driven with a stand-in.

use crate::file_category::extension_of;
use crate::file_organizer::{OrganizeError, OrganizeResult, ensure_dir, split_file_name};
use crate::normalize::normalize;
use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Bytes read from the start of a file to identify its format.
const SNIFF_LEN: u64 = 8192;

/// Large enough to cover the `ustar` magic at offset 257 of a tar header.
const TAR_HEADER_LEN: u64 = 512;

/// Used when a name normalizes to nothing, as with `ъ.zip`.
const UNNAMED: &str = "unnamed";

/// Errors reported by an [`Extractor`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file is not an archive of a format we can read. Recoverable.
    #[error("not a valid {format} archive: {reason}")]
    InvalidArchive { format: String, reason: String },
    /// Reading the archive or writing its contents failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ExtractError {
    fn invalid(format: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArchive {
            format: format.to_string(),
            reason: reason.into(),
        }
    }
}

/// Unpacks an archive file into a directory.
///
/// Implementations either extract everything or return an error; an
/// [`ExtractError::InvalidArchive`] must be returned before anything is
/// written to `destination`.
pub trait Extractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), ExtractError>;
}

/// Extracts ZIP, TAR and GZ (including `.tar.gz`) archives.
///
/// The format is chosen by extension and confirmed by sniffing the content,
/// so a `.zip` that is really a text file is rejected up front.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), ExtractError> {
        let ext = extension_of(archive);
        match ext.as_str() {
            "ZIP" => Self::extract_zip(archive, destination),
            "TAR" => Self::extract_tar(archive, destination),
            "GZ" => Self::extract_gz(archive, destination),
            other => Err(ExtractError::invalid(other, "unsupported archive format")),
        }
    }
}

impl ArchiveExtractor {
    fn extract_zip(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
        if !infer::archive::is_zip(&sniff(archive)?) {
            return Err(ExtractError::invalid("ZIP", "missing zip signature"));
        }

        let mut zip = zip::ZipArchive::new(File::open(archive)?).map_err(zip_error)?;
        zip.extract(destination).map_err(zip_error)
    }

    fn extract_tar(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
        if !infer::archive::is_tar(&sniff(archive)?) {
            return Err(ExtractError::invalid("TAR", "missing ustar header"));
        }

        tar::Archive::new(File::open(archive)?).unpack(destination)?;
        Ok(())
    }

    /// A gzipped tar is unpacked; any other gzip stream becomes a single
    /// file named after the archive's stem. Concatenated members are read
    /// as one stream.
    fn extract_gz(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
        if !infer::archive::is_gz(&sniff(archive)?) {
            return Err(ExtractError::invalid("GZ", "missing gzip magic"));
        }

        let mut decoder = MultiGzDecoder::new(File::open(archive)?);
        let mut head = Vec::with_capacity(TAR_HEADER_LEN as usize);
        (&mut decoder).take(TAR_HEADER_LEN).read_to_end(&mut head)?;
        let mut stream = io::Cursor::new(head).chain(decoder);

        if infer::archive::is_tar(stream.get_ref().0.get_ref()) {
            tar::Archive::new(stream).unpack(destination)?;
        } else {
            let (stem, _) = split_file_name(archive);
            let (inner_stem, inner_suffix) = split_file_name(Path::new(&stem));
            let name = format!("{}{inner_suffix}", safe_name(&inner_stem));
            let mut out = File::create(destination.join(name))?;
            io::copy(&mut stream, &mut out)?;
        }
        Ok(())
    }
}

/// Reads the first [`SNIFF_LEN`] bytes of `path`.
fn sniff(path: &Path) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Normalizes `stem`, falling back to [`UNNAMED`] when nothing is left.
fn safe_name(stem: &str) -> String {
    let name = normalize(stem);
    if name.is_empty() {
        UNNAMED.to_string()
    } else {
        name
    }
}

fn zip_error(err: zip::result::ZipError) -> ExtractError {
    match err {
        zip::result::ZipError::Io(e) => ExtractError::Io(e),
        other => ExtractError::invalid("ZIP", other.to_string()),
    }
}

/// Result of expanding one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Contents are in this folder and the archive file is gone.
    Extracted(PathBuf),
    /// Not a readable archive; the file was left where it was.
    Invalid { reason: String },
}

/// Moves an archive's contents into `archives/<normalized stem>/`.
pub struct ArchiveExpander<'a> {
    extractor: &'a dyn Extractor,
}

impl<'a> ArchiveExpander<'a> {
    pub fn new(extractor: &'a dyn Extractor) -> Self {
        Self { extractor }
    }

    /// Extracts `archive_path` into a folder under `archives_dir`.
    ///
    /// On success the archive file is deleted. An invalid archive is left in
    /// place and the folder created for it is removed again; any other
    /// failure is returned as an error.
    pub fn expand(&self, archive_path: &Path, archives_dir: &Path) -> OrganizeResult<ExpandOutcome> {
        ensure_dir(archives_dir)?;

        let (stem, _) = split_file_name(archive_path);
        let target = archives_dir.join(safe_name(&stem));
        let created = !target.exists();
        ensure_dir(&target)?;

        match self.extractor.extract(archive_path, &target) {
            Ok(()) => {
                fs::remove_file(archive_path).map_err(|e| OrganizeError::RemovalFailed {
                    path: archive_path.to_path_buf(),
                    source: e,
                })?;
                debug!(
                    archive = %archive_path.display(),
                    into = %target.display(),
                    "extracted archive"
                );
                Ok(ExpandOutcome::Extracted(target))
            }
            Err(ExtractError::InvalidArchive { format, reason }) => {
                warn!(
                    archive = %archive_path.display(),
                    %format,
                    %reason,
                    "not a valid archive, leaving it in place"
                );
                if created {
                    fs::remove_dir_all(&target).map_err(|e| OrganizeError::RemovalFailed {
                        path: target.clone(),
                        source: e,
                    })?;
                }
                Ok(ExpandOutcome::Invalid {
                    reason: format!("not a valid {format} archive: {reason}"),
                })
            }
            Err(ExtractError::Io(source)) => Err(OrganizeError::ArchiveFailure {
                path: archive_path.to_path_buf(),
                source,
            }),
        }
    }
}
