//! CLI argument definitions.
//!
//! This module defines the command-line arguments using clap.

use clap::Parser;
use std::path::PathBuf;

/// Commit gate - decide whether a commit affects a monorepo task.
///
/// Prints `0` on stdout when the deployment can be skipped and `1` when it
/// must proceed. Diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(name = "commit-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Task to check (e.g. `build`).
    pub task: String,

    /// Workspace the task is scoped to (e.g. `web`).
    pub workspace: String,

    /// Path to the configuration file.
    #[arg(short, long, env = "COMMIT_GATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository root (overrides the configuration).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Format of the report written to stderr (text, json).
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["commit-gate", "build", "web"]).expect("args should parse");
        assert_eq!(cli.task, "build");
        assert_eq!(cli.workspace, "web");
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(!cli.verbose);
        assert!(cli.root.is_none());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "commit-gate",
            "--output",
            "json",
            "-v",
            "--root",
            "/repo",
            "deploy",
            "api",
        ])
        .expect("args should parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/repo")));
        assert_eq!(cli.task, "deploy");
    }

    #[test]
    fn test_workspace_is_required() {
        assert!(Cli::try_parse_from(["commit-gate", "build"]).is_err());
    }
}
