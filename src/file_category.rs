//! Extension-based file categorization.
//!
//! Every file lands in exactly one [`Category`]. The extension table is fixed
//! and built once per process; anything it does not list falls back to
//! [`Category::Others`].
//!
//! # Examples
//!
//! ```
//! use sortfolder::file_category::{Category, classify};
//!
//! assert_eq!(classify("png"), Category::Images);
//! assert_eq!(classify("Mp3"), Category::Audio);
//! assert_eq!(classify("tar"), Category::Archives);
//! assert_eq!(classify("exe"), Category::Others);
//! assert_eq!(classify(""), Category::Others);
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Destination bucket for a file.
///
/// Declaration order is the lookup order and the order used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// JPEG, PNG, JPG, SVG
    Images,
    /// AVI, MP4, MOV, MKV
    Video,
    /// DOC, DOCX, TXT, PDF, XLSX, PPTX
    Documents,
    /// MP3, OGG, WAV, AMR
    Audio,
    /// ZIP, GZ, TAR; extracted rather than moved
    Archives,
    /// Everything else
    Others,
}

impl Category {
    /// All categories in lookup order.
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Video,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// ```
    /// use sortfolder::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Others.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Others => "others",
        }
    }

    /// Capitalized name used as a report heading.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Video => "Video",
            Category::Documents => "Documents",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Others => "Others",
        }
    }

    /// True for every category backed by table entries, i.e. all but `Others`.
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Others)
    }

    /// Returns true if `name` is one of the category directory names.
    ///
    /// Directories with these names are treated as output of an earlier run
    /// and are never descended into.
    pub fn is_reserved_dir_name(name: &str) -> bool {
        Self::ALL.iter().any(|c| c.dir_name() == name)
    }
}

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive; extensions are stored uppercased.
#[derive(Debug, Clone)]
pub struct FileMapper {
    entries: Vec<(Category, HashSet<&'static str>)>,
}

static STANDARD_MAPPER: LazyLock<FileMapper> = LazyLock::new(FileMapper::new);

impl FileMapper {
    /// Creates a mapper with the standard table.
    fn new() -> Self {
        let table: [(Category, &[&'static str]); 5] = [
            (Category::Images, &["JPEG", "PNG", "JPG", "SVG"]),
            (Category::Video, &["AVI", "MP4", "MOV", "MKV"]),
            (
                Category::Documents,
                &["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"],
            ),
            (Category::Audio, &["MP3", "OGG", "WAV", "AMR"]),
            (Category::Archives, &["ZIP", "GZ", "TAR"]),
        ];

        Self {
            entries: table
                .into_iter()
                .map(|(category, exts)| (category, exts.iter().copied().collect()))
                .collect(),
        }
    }

    /// The process-wide table.
    pub fn standard() -> &'static FileMapper {
        &STANDARD_MAPPER
    }

    /// Maps an extension (without the leading dot) to a category, if listed.
    ///
    /// ```
    /// use sortfolder::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::standard();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        let ext = ext.to_uppercase();
        self.entries
            .iter()
            .find(|(_, exts)| exts.contains(ext.as_str()))
            .map(|(category, _)| *category)
    }

    /// Like [`extension_to_category`](Self::extension_to_category) but total:
    /// unlisted extensions yield `Others`.
    pub fn categorize(&self, ext: &str) -> Category {
        self.extension_to_category(ext).unwrap_or(Category::Others)
    }
}

/// Classifies an extension against the standard table.
pub fn classify(ext: &str) -> Category {
    FileMapper::standard().categorize(ext)
}

/// Returns the uppercased extension of `path`, or an empty string.
///
/// Hidden files such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
