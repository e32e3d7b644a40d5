//! sortfolder - recursive folder sorting by file type
//!
//! This library classifies files by extension into category folders,
//! transliterates Cyrillic file names into ASCII-safe ones, unpacks archives
//! into per-archive folders and prunes directories left empty.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod normalize;
pub mod output;
pub mod report;
pub mod walker;

pub use archive::{ArchiveExpander, ArchiveExtractor, ExtractError, Extractor};
pub use config::{ConfigError, SortConfig};
pub use file_category::{Category, FileMapper, classify};
pub use file_organizer::{CollisionPolicy, FileOrganizer, OrganizeError, OrganizeResult};
pub use normalize::normalize;
pub use report::SortReport;
pub use walker::{SortOptions, Sorter, sort_folder};

pub use cli::{Cli, run_cli};
