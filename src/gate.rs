//! Commit gate orchestration.
//!
//! This module drives one invocation: overrides first, then the plan of the
//! current commit, a checkout of the parent commit, the plan of the parent,
//! and finally the diff. The two fetches are strictly sequential because the
//! second one observes the checkout.

use tracing::{error, info};

use crate::error::Result;
use crate::git::Repository;
use crate::overrides::{OverrideCheck, OverrideContext};
use crate::planner::{PlanProvider, TaskDiffEngine, Verdict};

/// Orchestrator deciding whether a commit affects a task.
pub struct Gate<'a, P: PlanProvider, R: Repository> {
    /// Plan snapshot provider.
    provider: &'a P,
    /// Repository whose working copy is moved to the parent commit.
    repository: &'a R,
    /// Override check.
    overrides: OverrideCheck,
    /// Diff engine.
    engine: TaskDiffEngine,
}

impl<'a, P: PlanProvider, R: Repository> Gate<'a, P, R> {
    /// Creates a new gate.
    #[must_use]
    pub const fn new(provider: &'a P, repository: &'a R, overrides: OverrideCheck) -> Self {
        Self {
            provider,
            repository,
            overrides,
            engine: TaskDiffEngine::new(),
        }
    }

    /// Decides whether `task` in `workspace` is affected by the checked-out commit.
    ///
    /// Overrides in `context` short-circuit before any plan is fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if either plan cannot be fetched or the parent commit
    /// cannot be checked out. No partial verdict is produced.
    pub async fn decide(
        &self,
        context: &OverrideContext,
        task: &str,
        workspace: &str,
    ) -> Result<Verdict> {
        if let Some(verdict) = self.overrides.evaluate(context, workspace) {
            return Ok(verdict);
        }

        self.compare(task, workspace).await
    }

    /// Compares the plans of the checked-out commit and its parent.
    ///
    /// Leaves the working copy detached at the parent commit.
    ///
    /// # Errors
    ///
    /// Returns an error if either plan cannot be fetched or the parent commit
    /// cannot be checked out.
    pub async fn compare(&self, task: &str, workspace: &str) -> Result<Verdict> {
        self.run_comparison(task, workspace).await.inspect_err(|e| {
            error!("Failed to determine task hash diff: {e}");
        })
    }

    async fn run_comparison(&self, task: &str, workspace: &str) -> Result<Verdict> {
        info!("Fetching plan for \"{task}\" in \"{workspace}\" at the current commit");
        let current = self.provider.fetch_plan(task, workspace).await?;

        self.repository.checkout_parent().await?;

        info!("Fetching plan for \"{task}\" in \"{workspace}\" at the parent commit");
        let previous = self.provider.fetch_plan(task, workspace).await?;

        Ok(self.engine.decide(task, workspace, &current, &previous)?)
    }
}
