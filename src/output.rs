//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: status lines and
//! the end-of-run report.

use crate::file_category::Category;
use crate::report::SortReport;
use colored::*;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// ```no_run
    /// use sortfolder::output::OutputFormatter;
    /// OutputFormatter::error("Failed to sort folder");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints the whole report.
    ///
    /// Per-category lists come first, then the known and unknown extension
    /// lists, then anything that needs the user's attention.
    pub fn print_report(report: &SortReport) {
        print!("{}", Self::render_report(report));

        for notice in Self::render_notices(report) {
            Self::warning(&notice);
        }

        Self::success(&format!(
            "Sorted {} {} in {}",
            report.total_relocated(),
            if report.total_relocated() == 1 {
                "entry"
            } else {
                "entries"
            },
            report.root.display()
        ));
    }

    /// Plain-text body of the report, without colors or trailing notices.
    pub fn render_report(report: &SortReport) -> String {
        let mut out = String::from("List of files in each category:\n");
        for category in Category::ALL {
            let _ = writeln!(out, "\n{}:", category.label());
            for path in report.files_in(category) {
                let _ = writeln!(out, "  {}", path.display());
            }
        }

        let _ = writeln!(out, "\nList of all known extensions:");
        let _ = writeln!(out, "{}", join_extensions(&report.known_extensions));
        let _ = writeln!(out, "\nList of all unknown extensions:");
        let _ = writeln!(out, "{}", join_extensions(&report.unknown_extensions));
        out
    }

    /// One line per failed archive and per skipped file.
    pub fn render_notices(report: &SortReport) -> Vec<String> {
        let failed = report.failed_archives.iter().map(|failed| {
            format!(
                "It is not a valid archive: {} ({})",
                failed.path.display(),
                failed.reason
            )
        });
        let skipped = report.skipped.iter().map(|skipped| {
            format!(
                "Left in place, destination name taken: {}",
                skipped.display()
            )
        });
        failed.chain(skipped).collect()
    }
}

fn join_extensions(exts: &BTreeSet<String>) -> String {
    exts.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
