//! Command-line interface module for sortfolder.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Prompting for a folder when none is given
//! - Configuration loading
//! - Report output

use crate::config::SortConfig;
use crate::file_organizer::CollisionPolicy;
use crate::output::OutputFormatter;
use crate::walker::sort_folder;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Sort a folder into category subfolders, transliterating Cyrillic names and
/// unpacking archives.
#[derive(Debug, Parser)]
#[command(name = "sortfolder", version, about)]
pub struct Cli {
    /// Folder to sort. Prompted for when omitted.
    pub path: Option<PathBuf>,

    /// What to do when a normalized name is already taken.
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// Configuration file to use instead of the default lookup.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log every file operation to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the CLI with already parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sortfolder::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["sortfolder", "/path/to/folder", "--json"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {e:#}");
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = SortConfig::load(cli.config.as_deref()).context("Error loading configuration")?;
    let options = config.sort_options(cli.on_collision);

    let folder = match cli.path {
        Some(path) => path,
        None => prompt_for_folder(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    if !cli.json {
        OutputFormatter::info(&format!("Sorting contents of: {}", folder.display()));
    }

    let report = sort_folder(&folder, &options)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Error serializing report")?
        );
    } else {
        OutputFormatter::print_report(&report);
    }
    Ok(())
}

/// Asks for the folder to sort and reads one line.
pub fn prompt_for_folder(input: &mut impl BufRead, output: &mut impl Write) -> Result<PathBuf> {
    write!(output, "Enter the path to the folder for sorting: ")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Error reading folder path")?;

    let trimmed = line.trim();
    anyhow::ensure!(!trimmed.is_empty(), "No folder path given");
    Ok(Path::new(trimmed).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "sortfolder",
            "/tmp/in",
            "--on-collision",
            "rename",
            "--json",
        ]);
        assert_eq!(cli.path, Some(PathBuf::from("/tmp/in")));
        assert_eq!(cli.on_collision, Some(CollisionPolicy::Rename));
        assert!(cli.json);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_path_is_optional() {
        let cli = Cli::parse_from(["sortfolder", "-v"]);
        assert!(cli.path.is_none());
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["sortfolder", "--on-collision", "merge"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_reads_trimmed_line() {
        let mut input = io::Cursor::new("  /home/me/Downloads \n");
        let mut output = Vec::new();

        let folder = prompt_for_folder(&mut input, &mut output).unwrap();

        assert_eq!(folder, PathBuf::from("/home/me/Downloads"));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Enter the path to the folder for sorting: "
        );
    }

    #[test]
    fn test_prompt_rejects_empty_input() {
        let mut input = io::Cursor::new("\n");
        let mut output = Vec::new();
        assert!(prompt_for_folder(&mut input, &mut output).is_err());
    }
}
