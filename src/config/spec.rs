//! Configuration specification types for the commit gate.
//!
//! This module defines the structs that map to the optional `commit-gate.yaml`
//! file. Every field has a default so an invocation works without any file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default environment variable that forces a deployment.
pub const DEFAULT_FORCE_ENV: &str = "TURBO_FORCE";

/// Default keyword of the commit message marker (`[deploy <workspace>]`).
pub const DEFAULT_MARKER_PREFIX: &str = "deploy";

/// Default package runner used to launch the planner.
pub const DEFAULT_RUNNER: &str = "bunx";

/// Default planner tool.
pub const DEFAULT_TOOL: &str = "turbo";

/// Version used when nothing pins the planner tool.
pub const LATEST_VERSION: &str = "latest";

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GateConfig {
    /// Repository root the planner and git run in.
    pub root: PathBuf,
    /// Environment variable that forces a deployment when set to `true`.
    pub force_env: String,
    /// Keyword of the commit message marker.
    pub marker_prefix: String,
    /// Planner invocation settings.
    pub planner: PlannerConfig,
}

/// Planner invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Package runner (e.g. `bunx`, `npx`, `pnpm dlx`).
    pub runner: String,
    /// Planner package name.
    pub tool: String,
    /// Pinned planner version. Inferred from `package.json` when absent.
    pub version: Option<String>,
    /// Full argv prefix replacing `<runner> <tool>@<version>`.
    pub command: Option<Vec<String>>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            force_env: String::from(DEFAULT_FORCE_ENV),
            marker_prefix: String::from(DEFAULT_MARKER_PREFIX),
            planner: PlannerConfig::default(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            runner: String::from(DEFAULT_RUNNER),
            tool: String::from(DEFAULT_TOOL),
            version: None,
            command: None,
        }
    }
}

impl PlannerConfig {
    /// Formats the versioned tool spec passed to the runner (`turbo@2.1.0`).
    #[must_use]
    pub fn tool_spec(&self, version: &str) -> String {
        format!("{}@{version}", self.tool)
    }
}
