//! Planning module for commit comparison.
//!
//! This module fetches plan snapshots from the external planner and compares
//! the snapshots of two commits to produce a skip / do-not-skip verdict.

mod diff;
mod provider;
mod snapshot;
mod verdict;

pub use diff::{TaskDiffEngine, TaskSetDiff};
pub use provider::{PlanProvider, TurboPlanProvider};
pub use snapshot::{PlanSnapshot, WorkItem};
pub use verdict::{HashChange, SIGNAL_DEPLOY, SIGNAL_SKIP, Verdict, VerdictReason};
