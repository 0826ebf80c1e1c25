//! Output formatting for the verdict report.
//!
//! The report is written to stderr; stdout only ever carries the numeric
//! verdict signal.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::planner::{HashChange, Verdict};

use super::commands::OutputFormat;

/// Prefix of every human-readable line (the "≫" symbol).
pub const LOG_PREFIX: &str = "\u{226B}  ";

/// Number of hash characters shown in tables.
const SHORT_HASH_LEN: usize = 8;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
    /// Whether per-task details are shown.
    detailed: bool,
}

/// Hash change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Task")]
    task_id: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Current")]
    current: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self {
            format,
            detailed: false,
        }
    }

    /// Enables the per-task change table.
    #[must_use]
    pub const fn with_details(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    /// Formats the opening banner.
    #[must_use]
    pub fn format_banner(&self) -> Option<String> {
        match self.format {
            OutputFormat::Json => None,
            OutputFormat::Text => Some(format!(
                "{LOG_PREFIX}Using Turborepo to determine if this project is affected by the commit...\n"
            )),
        }
    }

    /// Formats a verdict for display.
    #[must_use]
    pub fn format_verdict(&self, verdict: &Verdict) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(verdict).unwrap_or_default(),
            OutputFormat::Text => self.format_verdict_text(verdict),
        }
    }

    /// Formats a verdict as text.
    fn format_verdict_text(&self, verdict: &Verdict) -> String {
        let mut output = String::new();

        let reason = verdict.reason.to_string();
        let reason = if verdict.skip {
            reason.green()
        } else {
            reason.yellow()
        };
        let _ = writeln!(output, "{LOG_PREFIX}{reason}");

        if self.detailed && !verdict.changes.is_empty() {
            let _ = writeln!(output, "{}", Self::format_changes(&verdict.changes));
        }

        if verdict.skip {
            let _ = writeln!(output, "{LOG_PREFIX}{} Ignoring the change", "\u{23ED}".cyan());
        } else {
            let _ = writeln!(
                output,
                "{LOG_PREFIX}{} Proceeding with deployment",
                "\u{2713}".green()
            );
        }

        output
    }

    /// Formats hash changes as a table.
    fn format_changes(changes: &[HashChange]) -> String {
        let rows: Vec<ChangeRow> = changes
            .iter()
            .map(|c| ChangeRow {
                task_id: c.task_id.clone(),
                package: c.package.clone(),
                previous: short_hash(&c.previous_hash),
                current: short_hash(&c.current_hash),
            })
            .collect();

        Table::new(rows).to_string()
    }
}

/// Computes a short hash for display purposes.
fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}
