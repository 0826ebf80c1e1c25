//! Plan snapshot types and wire format.
//!
//! A snapshot is the planner's dry-run answer for one commit: the packages in
//! scope plus the tasks it would run, in topological order.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// One task scheduled for one package within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    /// Stable identifier combining package and task (`web#build`).
    pub task_id: String,
    /// Task name.
    pub task: String,
    /// Owning package.
    pub package: String,
    /// Fingerprint of the task's resolved inputs.
    #[serde(rename = "hash")]
    pub content_hash: String,
}

/// Ordered plan for one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Packages included in the plan.
    pub packages: Vec<String>,
    /// Work items, dependencies before dependents.
    pub tasks: Vec<WorkItem>,
}

impl WorkItem {
    /// Creates a work item with the conventional `<package>#<task>` identifier.
    #[must_use]
    pub fn new(package: impl Into<String>, task: impl Into<String>, content_hash: impl Into<String>) -> Self {
        let package = package.into();
        let task = task.into();
        Self {
            task_id: format!("{package}#{task}"),
            task,
            package,
            content_hash: content_hash.into(),
        }
    }
}

impl PlanSnapshot {
    /// Creates a snapshot from packages and ordered work items.
    #[must_use]
    pub const fn new(packages: Vec<String>, tasks: Vec<WorkItem>) -> Self {
        Self { packages, tasks }
    }

    /// Parses the planner's JSON output.
    ///
    /// Fields other than `packages` and `tasks` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is not a valid plan.
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(raw).map_err(|e| ProviderError::invalid_response(e.to_string()))
    }

    /// Returns true if the package is part of this plan.
    #[must_use]
    pub fn contains_package(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }

    /// Fails unless the workspace is part of this plan.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceNotFound` if the workspace is absent.
    pub fn ensure_workspace(&self, workspace: &str) -> Result<(), ProviderError> {
        if self.contains_package(workspace) {
            Ok(())
        } else {
            Err(ProviderError::workspace_not_found(workspace))
        }
    }

    /// Returns the task identifiers in plan order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.task_id.clone()).collect()
    }

    /// Returns the number of work items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the plan schedules nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
