//! Forced-deployment overrides.
//!
//! Overrides are checked before any plan is fetched. Process state is read
//! once at the boundary into an [`OverrideContext`]; the check itself is a
//! pure function of that context.

use tracing::{debug, info};

use crate::error::Result;
use crate::git::Repository;
use crate::planner::{Verdict, VerdictReason};

/// Value of the force variable that enables it.
const FORCE_VALUE: &str = "true";

/// Inputs for the override check, captured once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideContext {
    /// Name of the force environment variable.
    pub force_env: String,
    /// Whether the force variable is set to `true`.
    pub force_flag: bool,
    /// Message of the checked-out commit, if it was read.
    pub commit_message: Option<String>,
}

/// Result of scanning a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitCheck {
    /// The message forces a deployment.
    Deploy {
        /// The marker that was found.
        marker: String,
    },
    /// No marker; continue with the plan comparison.
    Continue,
}

/// Evaluates override signals for a workspace.
#[derive(Debug, Clone)]
pub struct OverrideCheck {
    /// Keyword of the commit marker.
    marker_prefix: String,
}

impl OverrideContext {
    /// Creates a context from explicit values.
    #[must_use]
    pub fn new(force_env: impl Into<String>, force_flag: bool, commit_message: Option<String>) -> Self {
        Self {
            force_env: force_env.into(),
            force_flag,
            commit_message,
        }
    }

    /// Reads the force flag through `lookup`.
    ///
    /// Only the exact value `true` enables the flag.
    #[must_use]
    pub fn force_flag_from(force_env: &str, lookup: impl Fn(&str) -> Option<String>) -> bool {
        lookup(force_env).is_some_and(|value| value == FORCE_VALUE)
    }

    /// Captures the context from the process environment and the repository.
    ///
    /// The commit message is not read when the force flag is already set.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit message cannot be read.
    pub async fn capture<R: Repository + ?Sized>(force_env: &str, repository: &R) -> Result<Self> {
        let force_flag = Self::force_flag_from(force_env, |key| std::env::var(key).ok());

        let commit_message = if force_flag {
            None
        } else {
            Some(repository.head_commit_message().await?)
        };

        Ok(Self::new(force_env, force_flag, commit_message))
    }
}

impl OverrideCheck {
    /// Creates a check using `[<marker_prefix> <workspace>]` as the marker.
    #[must_use]
    pub fn new(marker_prefix: impl Into<String>) -> Self {
        Self {
            marker_prefix: marker_prefix.into(),
        }
    }

    /// Returns the force-deploy marker for a workspace.
    #[must_use]
    pub fn marker(&self, workspace: &str) -> String {
        format!("[{} {workspace}]", self.marker_prefix)
    }

    /// Scans a commit message for the workspace's marker.
    #[must_use]
    pub fn check_commit(&self, message: &str, workspace: &str) -> CommitCheck {
        let marker = self.marker(workspace);
        if message.contains(&marker) {
            CommitCheck::Deploy { marker }
        } else {
            debug!("No deploy or skip string found in commit message.");
            CommitCheck::Continue
        }
    }

    /// Returns a forced verdict if any override fired.
    #[must_use]
    pub fn evaluate(&self, context: &OverrideContext, workspace: &str) -> Option<Verdict> {
        if context.force_flag {
            let reason = VerdictReason::ForcedByEnv {
                variable: context.force_env.clone(),
            };
            info!("{reason}");
            return Some(Verdict::deploy(reason));
        }

        let message = context.commit_message.as_deref()?;
        match self.check_commit(message, workspace) {
            CommitCheck::Deploy { marker } => {
                let reason = VerdictReason::ForcedByCommit { marker };
                info!("{reason}");
                Some(Verdict::deploy(reason))
            }
            CommitCheck::Continue => None,
        }
    }
}
