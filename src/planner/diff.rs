//! Diff engine for comparing the plans of two commits.
//!
//! The planner orders tasks deterministically for a given graph, so the two
//! snapshots are paired by position. A different length or a different task id
//! at any position means the graph itself changed.

use tracing::{debug, info};

use crate::error::ProviderError;

use super::snapshot::PlanSnapshot;
use super::verdict::{HashChange, Verdict, VerdictReason};

/// Engine for deciding whether a commit affects a task.
#[derive(Debug, Default)]
pub struct TaskDiffEngine;

/// Structural and content difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSetDiff {
    /// The task sequence differs (length or positional id).
    Restructured {
        /// First position where the sequences disagree.
        position: usize,
    },
    /// Same task sequence; zero or more hashes differ.
    Content {
        /// Changed tasks in plan order.
        changes: Vec<HashChange>,
        /// Owning packages of the changed tasks, first-seen order, deduplicated.
        changed_packages: Vec<String>,
    },
}

impl TaskDiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the diff between the current and previous snapshots.
    #[must_use]
    pub fn compute_diff(&self, current: &PlanSnapshot, previous: &PlanSnapshot) -> TaskSetDiff {
        if current.len() != previous.len() {
            debug!(
                "Task count changed: {} => {}",
                previous.len(),
                current.len()
            );
            return TaskSetDiff::Restructured {
                position: current.len().min(previous.len()),
            };
        }

        let mut changes = Vec::new();
        let mut changed_packages: Vec<String> = Vec::new();

        for (position, (cur, prev)) in current.tasks.iter().zip(&previous.tasks).enumerate() {
            if cur.task_id != prev.task_id {
                debug!(
                    "Task order changed at position {position}: {} => {}",
                    prev.task_id, cur.task_id
                );
                return TaskSetDiff::Restructured { position };
            }

            if cur.content_hash != prev.content_hash {
                debug!(
                    "Hash changed for {}: {} => {}",
                    cur.task_id, prev.content_hash, cur.content_hash
                );
                if !changed_packages.contains(&cur.package) {
                    changed_packages.push(cur.package.clone());
                }
                changes.push(HashChange {
                    task_id: cur.task_id.clone(),
                    package: cur.package.clone(),
                    previous_hash: prev.content_hash.clone(),
                    current_hash: cur.content_hash.clone(),
                });
            }
        }

        TaskSetDiff::Content {
            changes,
            changed_packages,
        }
    }

    /// Decides whether `task` in `workspace` is affected.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceNotFound` if either snapshot lacks the workspace.
    pub fn decide(
        &self,
        task: &str,
        workspace: &str,
        current: &PlanSnapshot,
        previous: &PlanSnapshot,
    ) -> Result<Verdict, ProviderError> {
        current.ensure_workspace(workspace)?;
        previous.ensure_workspace(workspace)?;

        let verdict = match self.compute_diff(current, previous) {
            TaskSetDiff::Restructured { .. } => Verdict::deploy(VerdictReason::TasksChanged {
                workspace: workspace.to_string(),
                previous: previous.task_ids(),
                current: current.task_ids(),
            }),
            TaskSetDiff::Content {
                changed_packages, ..
            } if changed_packages.is_empty() => Verdict::skip(VerdictReason::Unaffected {
                task: task.to_string(),
                workspace: workspace.to_string(),
            }),
            TaskSetDiff::Content {
                changes,
                changed_packages,
            } => {
                let dependencies = attribute_dependencies(workspace, &changed_packages);
                Verdict::deploy(VerdictReason::Affected {
                    workspace: workspace.to_string(),
                    changed_packages,
                    dependencies,
                })
                .with_changes(changes)
            }
        };

        info!("{}", verdict.reason);
        Ok(verdict)
    }
}

/// Splits the changed packages into the workspace itself and its dependencies.
///
/// A single changed package is attributed to the workspace. Otherwise the
/// workspace is matched by name, so its position in the list is irrelevant.
fn attribute_dependencies(workspace: &str, changed_packages: &[String]) -> Vec<String> {
    if changed_packages.len() == 1 {
        return Vec::new();
    }

    changed_packages
        .iter()
        .filter(|package| package.as_str() != workspace)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::snapshot::WorkItem;

    fn snapshot(items: &[(&str, &str, &str)]) -> PlanSnapshot {
        let tasks: Vec<WorkItem> = items
            .iter()
            .map(|(package, task, hash)| WorkItem::new(*package, *task, *hash))
            .collect();
        let mut packages: Vec<String> = Vec::new();
        for item in &tasks {
            if !packages.contains(&item.package) {
                packages.push(item.package.clone());
            }
        }
        PlanSnapshot::new(packages, tasks)
    }

    fn decide(current: &PlanSnapshot, previous: &PlanSnapshot, workspace: &str) -> Verdict {
        TaskDiffEngine::new()
            .decide("build", workspace, current, previous)
            .expect("decision should succeed")
    }

    #[test]
    fn test_identical_snapshots_skip() {
        let current = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h2")]);
        let previous = current.clone();

        let verdict = decide(&current, &previous, "pkgB");
        assert!(verdict.skip);
        assert_eq!(
            verdict.reason,
            VerdictReason::Unaffected {
                task: String::from("build"),
                workspace: String::from("pkgB"),
            }
        );
        assert!(verdict.changes.is_empty());
    }

    #[test]
    fn test_length_change_is_tasks_changed() {
        let current = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h2")]);
        let previous = snapshot(&[("pkgB", "build", "h2")]);

        let verdict = decide(&current, &previous, "pkgB");
        assert!(!verdict.skip);
        assert_eq!(
            verdict.reason,
            VerdictReason::TasksChanged {
                workspace: String::from("pkgB"),
                previous: vec![String::from("pkgB#build")],
                current: vec![String::from("pkgA#build"), String::from("pkgB#build")],
            }
        );
    }

    #[test]
    fn test_length_change_ignores_hashes() {
        let current = snapshot(&[("pkgB", "build", "h2"), ("pkgB", "lint", "h9")]);
        let previous = snapshot(&[("pkgB", "build", "h2")]);

        let verdict = decide(&current, &previous, "pkgB");
        assert_eq!(verdict.reason.rule(), "tasks_changed");
    }

    #[test]
    fn test_positional_id_mismatch_is_tasks_changed() {
        let current = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h2")]);
        let previous = snapshot(&[("pkgC", "build", "h1"), ("pkgB", "build", "h2")]);

        let verdict = decide(&current, &previous, "pkgB");
        assert!(!verdict.skip);
        assert_eq!(verdict.reason.rule(), "tasks_changed");
    }

    #[test]
    fn test_reordered_but_unchanged_graph_is_tasks_changed() {
        let current = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h2")]);
        let previous = snapshot(&[("pkgB", "build", "h2"), ("pkgA", "build", "h1")]);

        let engine = TaskDiffEngine::new();
        assert_eq!(
            engine.compute_diff(&current, &previous),
            TaskSetDiff::Restructured { position: 0 }
        );
        assert_eq!(decide(&current, &previous, "pkgB").reason.rule(), "tasks_changed");
    }

    #[test]
    fn test_single_hash_change_names_owning_package() {
        let current = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h3")]);
        let previous = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h2")]);

        let verdict = decide(&current, &previous, "pkgB");
        assert!(!verdict.skip);
        assert_eq!(
            verdict.reason,
            VerdictReason::Affected {
                workspace: String::from("pkgB"),
                changed_packages: vec![String::from("pkgB")],
                dependencies: vec![],
            }
        );
        assert_eq!(verdict.reason.to_string(), "This commit affects \"pkgB\"");
        assert_eq!(
            verdict.changes,
            vec![HashChange {
                task_id: String::from("pkgB#build"),
                package: String::from("pkgB"),
                previous_hash: String::from("h2"),
                current_hash: String::from("h3"),
            }]
        );
    }

    #[test]
    fn test_workspace_plus_dependency() {
        let current = snapshot(&[("pkgA", "build", "h4"), ("pkgB", "build", "h3")]);
        let previous = snapshot(&[("pkgA", "build", "h1"), ("pkgB", "build", "h2")]);

        let verdict = decide(&current, &previous, "pkgB");
        assert_eq!(
            verdict.reason,
            VerdictReason::Affected {
                workspace: String::from("pkgB"),
                changed_packages: vec![String::from("pkgA"), String::from("pkgB")],
                dependencies: vec![String::from("pkgA")],
            }
        );
        assert_eq!(
            verdict.reason.to_string(),
            "This commit affects \"pkgB\" and 1 dependency (pkgA)"
        );
    }

    #[test]
    fn test_packages_deduplicated_in_first_seen_order() {
        let current = snapshot(&[
            ("utils", "build", "u2"),
            ("ui", "build", "x2"),
            ("ui", "lint", "y2"),
            ("utils", "lint", "v2"),
            ("web", "build", "w2"),
        ]);
        let previous = snapshot(&[
            ("utils", "build", "u1"),
            ("ui", "build", "x1"),
            ("ui", "lint", "y1"),
            ("utils", "lint", "v1"),
            ("web", "build", "w1"),
        ]);

        let verdict = decide(&current, &previous, "web");
        assert_eq!(verdict.changes.len(), 5);
        assert_eq!(
            verdict.reason.to_string(),
            "This commit affects \"web\" and 2 dependencies (utils, ui)"
        );
    }

    #[test]
    fn test_workspace_located_by_name_not_position() {
        // The workspace's own task is not the last changed entry
        let current = snapshot(&[("web", "build", "w2"), ("e2e", "build", "e2")]);
        let previous = snapshot(&[("web", "build", "w1"), ("e2e", "build", "e1")]);

        let verdict = decide(&current, &previous, "web");
        assert_eq!(
            verdict.reason,
            VerdictReason::Affected {
                workspace: String::from("web"),
                changed_packages: vec![String::from("web"), String::from("e2e")],
                dependencies: vec![String::from("e2e")],
            }
        );
    }

    #[test]
    fn test_single_dependency_change_is_attributed_to_workspace() {
        let current = snapshot(&[("ui", "build", "x2"), ("web", "build", "w1")]);
        let previous = snapshot(&[("ui", "build", "x1"), ("web", "build", "w1")]);

        let verdict = decide(&current, &previous, "web");
        assert!(!verdict.skip);
        assert_eq!(
            verdict.reason,
            VerdictReason::Affected {
                workspace: String::from("web"),
                changed_packages: vec![String::from("ui")],
                dependencies: vec![],
            }
        );
        assert_eq!(verdict.reason.to_string(), "This commit affects \"web\"");
        assert_eq!(verdict.changes[0].package, "ui");
    }

    #[test]
    fn test_only_dependencies_changed() {
        let current = snapshot(&[
            ("utils", "build", "u2"),
            ("ui", "build", "x2"),
            ("web", "build", "w1"),
        ]);
        let previous = snapshot(&[
            ("utils", "build", "u1"),
            ("ui", "build", "x1"),
            ("web", "build", "w1"),
        ]);

        let verdict = decide(&current, &previous, "web");
        assert_eq!(
            verdict.reason.to_string(),
            "This commit affects \"web\" and 2 dependencies (utils, ui)"
        );
    }

    #[test]
    fn test_missing_workspace_is_error() {
        let current = snapshot(&[("pkgA", "build", "h1")]);
        let previous = current.clone();

        let result = TaskDiffEngine::new().decide("build", "pkgB", &current, &previous);
        assert!(matches!(
            result,
            Err(ProviderError::WorkspaceNotFound { workspace }) if workspace == "pkgB"
        ));
    }

    #[test]
    fn test_workspace_missing_from_previous_is_error() {
        let current = snapshot(&[("web", "build", "h1")]);
        let previous = PlanSnapshot::new(vec![String::from("docs")], vec![]);

        let result = TaskDiffEngine::new().decide("build", "web", &current, &previous);
        assert!(matches!(result, Err(ProviderError::WorkspaceNotFound { .. })));
    }

    #[test]
    fn test_empty_plans_skip() {
        let current = PlanSnapshot::new(vec![String::from("web")], vec![]);
        let previous = current.clone();

        assert!(decide(&current, &previous, "web").skip);
    }
}
