//! CLI module for the commit gate.
//!
//! This module provides the command-line arguments and the formatting of
//! the verdict report.

mod commands;
mod output;

pub use commands::{Cli, OutputFormat};
pub use output::{LOG_PREFIX, OutputFormatter};
