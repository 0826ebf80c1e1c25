//! Error types for the commit gate.
//!
//! This module provides the error hierarchy for every stage of an invocation:
//! configuration, plan snapshot retrieval, and git operations.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status used for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Exit status used for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// The main error type for the commit gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan snapshot retrieval errors.
    #[error("Plan provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Git errors.
    #[error("Git error: {0}")]
    Git(#[from] GitError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// The package manifest could not be read or parsed.
    #[error("\"{path}\" could not be read: {message}")]
    Manifest {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
}

/// Plan snapshot retrieval errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The planner process could not be started.
    #[error("Failed to run `{command}`: {message}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Description of the spawn failure.
        message: String,
    },

    /// The planner process exited unsuccessfully.
    #[error("`{command}` exited with status {}: {stderr}", display_status(.status))]
    CommandFailed {
        /// Command line that failed.
        command: String,
        /// Exit status, if the process exited normally.
        status: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The planner output is not a valid plan.
    #[error("Invalid plan response: {message}")]
    InvalidResponse {
        /// Description of the parse failure.
        message: String,
    },

    /// The queried workspace is absent from the plan.
    #[error("Workspace not found in plan: {workspace}")]
    WorkspaceNotFound {
        /// The workspace that was queried.
        workspace: String,
    },
}

/// Git errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git could not be started.
    #[error("Failed to run `{command}`: {message}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Description of the spawn failure.
        message: String,
    },

    /// A git command exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// Command line that failed.
        command: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Result type alias for commit gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

fn display_status(status: &Option<i32>) -> String {
    status.map_or_else(|| String::from("signal"), |code| code.to_string())
}

impl GateError {
    /// Returns the process exit status for this error.
    ///
    /// Both values differ from the verdict output, which always exits with 0.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => EXIT_CONFIG_ERROR,
            Self::Provider(_) | Self::Git(_) => EXIT_FAILURE,
        }
    }

    /// Returns true if the queried workspace was missing from a plan.
    #[must_use]
    pub const fn is_workspace_not_found(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::WorkspaceNotFound { .. }))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a validation error without a specific field.
    #[must_use]
    pub fn validation_general(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: None,
        }
    }
}

impl ProviderError {
    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a workspace not found error.
    #[must_use]
    pub fn workspace_not_found(workspace: impl Into<String>) -> Self {
        Self::WorkspaceNotFound {
            workspace: workspace.into(),
        }
    }
}
