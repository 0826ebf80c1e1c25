//! Skip / do-not-skip verdicts and their justifications.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Verdict signal printed when the deployment can be skipped.
pub const SIGNAL_SKIP: u8 = 0;

/// Verdict signal printed when the deployment must proceed.
pub const SIGNAL_DEPLOY: u8 = 1;

/// The decision for one (task, workspace) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Whether the deployment can be skipped.
    pub skip: bool,
    /// The rule that produced the decision.
    pub reason: VerdictReason,
    /// Per-task hash changes behind a content-based decision.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<HashChange>,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
}

/// The rule that produced a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum VerdictReason {
    /// The force environment variable was set.
    ForcedByEnv {
        /// Name of the variable.
        variable: String,
    },
    /// The commit message carried the force-deploy marker.
    ForcedByCommit {
        /// The marker that was found.
        marker: String,
    },
    /// The task graph changed shape between the two commits.
    TasksChanged {
        /// The workspace under test.
        workspace: String,
        /// Task ids of the parent commit's plan.
        previous: Vec<String>,
        /// Task ids of the current commit's plan.
        current: Vec<String>,
    },
    /// At least one task hash changed.
    Affected {
        /// The workspace under test.
        workspace: String,
        /// Every package with a changed hash, first-seen order.
        changed_packages: Vec<String>,
        /// Changed packages other than the workspace itself.
        dependencies: Vec<String>,
    },
    /// Nothing relevant changed.
    Unaffected {
        /// The task under test.
        task: String,
        /// The workspace under test.
        workspace: String,
    },
}

/// A task whose content hash differs between the two commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashChange {
    /// Task identifier.
    pub task_id: String,
    /// Owning package.
    pub package: String,
    /// Hash at the parent commit.
    pub previous_hash: String,
    /// Hash at the current commit.
    pub current_hash: String,
}

impl Verdict {
    /// Creates a verdict allowing the deployment to be skipped.
    #[must_use]
    pub fn skip(reason: VerdictReason) -> Self {
        Self {
            skip: true,
            reason,
            changes: Vec::new(),
            decided_at: Utc::now(),
        }
    }

    /// Creates a verdict requiring the deployment to proceed.
    #[must_use]
    pub fn deploy(reason: VerdictReason) -> Self {
        Self {
            skip: false,
            reason,
            changes: Vec::new(),
            decided_at: Utc::now(),
        }
    }

    /// Attaches the hash changes behind the decision.
    #[must_use]
    pub fn with_changes(mut self, changes: Vec<HashChange>) -> Self {
        self.changes = changes;
        self
    }

    /// Returns the numeric signal for the primary output channel.
    #[must_use]
    pub const fn signal(&self) -> u8 {
        if self.skip { SIGNAL_SKIP } else { SIGNAL_DEPLOY }
    }

    /// Returns true if the decision came from an override rather than a diff.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        matches!(
            self.reason,
            VerdictReason::ForcedByEnv { .. } | VerdictReason::ForcedByCommit { .. }
        )
    }
}

impl VerdictReason {
    /// Short identifier of the rule.
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::ForcedByEnv { .. } => "forced_by_env",
            Self::ForcedByCommit { .. } => "forced_by_commit",
            Self::TasksChanged { .. } => "tasks_changed",
            Self::Affected { .. } => "affected",
            Self::Unaffected { .. } => "unaffected",
        }
    }
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForcedByEnv { variable } => write!(f, "`{variable}` detected"),
            Self::ForcedByCommit { marker } => write!(f, "Found commit message: {marker}"),
            Self::TasksChanged {
                workspace,
                previous,
                current,
            } => write!(
                f,
                "This commit changed the tasks for \"{workspace}\": {} => {}",
                previous.join(","),
                current.join(",")
            ),
            Self::Affected {
                workspace,
                dependencies,
                ..
            } => {
                write!(f, "This commit affects \"{workspace}\"")?;
                if !dependencies.is_empty() {
                    let noun = if dependencies.len() > 1 {
                        "dependencies"
                    } else {
                        "dependency"
                    };
                    write!(
                        f,
                        " and {} {noun} ({})",
                        dependencies.len(),
                        dependencies.join(", ")
                    )?;
                }
                Ok(())
            }
            Self::Unaffected { task, workspace } => write!(
                f,
                "The task \"{task}\" for \"{workspace}\" is not affected by this commit"
            ),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decision = if self.skip { "skip" } else { "deploy" };
        write!(f, "{decision}: {}", self.reason)
    }
}
