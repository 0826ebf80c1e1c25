//! Repository implementation backed by the `git` executable.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{GitError, Result};

use super::Repository;

/// Runs `git` subcommands in a working copy.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Working copy root.
    root: PathBuf,
}

impl GitCli {
    /// Creates a git runner for the working copy at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        debug!("Running `{command}` in {}", self.root.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| GitError::Spawn {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Repository for GitCli {
    async fn head_commit_message(&self) -> Result<String> {
        self.run(&["show", "-s", "--format=%B"]).await
    }

    async fn checkout_parent(&self) -> Result<()> {
        info!("Switching to parent commit");
        self.run(&["switch", "HEAD^", "--detach"]).await?;
        Ok(())
    }
}
