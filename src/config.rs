//! Run configuration loaded from TOML.
//!
//! The category table is fixed; what can be configured is how a run behaves
//! when a normalized file name is already taken.
//!
//! # Configuration File Format
//!
//! ```toml
//! [sort]
//! on_collision = "rename"   # overwrite | rename | skip
//! ```

use crate::file_organizer::CollisionPolicy;
use crate::walker::SortOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".sortfolder.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(#[from] toml::de::Error),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(#[from] std::io::Error),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SortConfig {
    #[serde(default)]
    pub sort: SortRules,
    /// Canonical path of the file this was loaded from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// The `[sort]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortRules {
    /// Defaults to overwriting.
    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

impl SortConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.sortfolder.toml` in the current directory
    /// 3. Look for `~/.config/sortfolder/config.toml`
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file is missing, or if any
    /// file that is found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortfolder")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.source = Some(fs::canonicalize(path)?);
        Ok(config)
    }

    /// Options for a run, with an optional command-line override.
    ///
    /// The file the configuration came from is preserved, so sorting the
    /// folder that holds it does not file it away under `others`.
    pub fn sort_options(&self, on_collision: Option<CollisionPolicy>) -> SortOptions {
        SortOptions {
            on_collision: on_collision.unwrap_or(self.sort.on_collision),
            preserve: self.source.clone(),
        }
    }
}
