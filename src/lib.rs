// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Commit Gate
//!
//! Decides whether a monorepo task is affected by the most recent commit, so a
//! deployment pipeline can skip redundant builds.
//!
//! ## Overview
//!
//! For a `(task, workspace)` pair the gate:
//!
//! 1. Checks override signals (a force environment variable, or a
//!    `[deploy <workspace>]` marker in the commit message)
//! 2. Asks the planner for a dry-run plan at the current commit
//! 3. Detaches the working copy at the parent commit
//! 4. Asks the planner for the plan again
//! 5. Compares both plans position by position
//!
//! The verdict is printed as a single number on stdout (`0` = skip,
//! `1` = deploy); every diagnostic goes to stderr.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading, validation and version inference
//! - [`overrides`]: Forced-deployment signals
//! - [`planner`]: Plan snapshots, the planner provider and the diff engine
//! - [`git`]: Repository access
//! - [`gate`]: Invocation orchestration
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use commit_gate::planner::{PlanSnapshot, TaskDiffEngine, WorkItem};
//!
//! let packages = vec![String::from("ui"), String::from("web")];
//! let previous = PlanSnapshot::new(
//!     packages.clone(),
//!     vec![WorkItem::new("ui", "build", "h1"), WorkItem::new("web", "build", "h2")],
//! );
//! let current = PlanSnapshot::new(
//!     packages,
//!     vec![WorkItem::new("ui", "build", "h1"), WorkItem::new("web", "build", "h3")],
//! );
//!
//! let verdict = TaskDiffEngine::new()
//!     .decide("build", "web", &current, &previous)
//!     .unwrap();
//! assert!(!verdict.skip);
//! assert_eq!(verdict.reason.to_string(), "This commit affects \"web\"");
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod git;
pub mod overrides;
pub mod planner;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, OutputFormat, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, GateConfig, ManifestReader};
pub use error::{GateError, Result};
pub use gate::Gate;
pub use git::{GitCli, Repository};
pub use overrides::{CommitCheck, OverrideCheck, OverrideContext};
pub use planner::{PlanProvider, PlanSnapshot, TaskDiffEngine, TurboPlanProvider, Verdict, WorkItem};
