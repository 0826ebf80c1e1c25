//! Configuration module for the commit gate.
//!
//! This module handles all configuration-related functionality:
//! - Parsing `commit-gate.yaml` and applying environment overrides
//! - Validation of configuration values and invocation arguments
//! - Inferring the planner version from the package manifest

mod manifest;
mod parser;
mod spec;
mod validator;

pub use manifest::{ManifestReader, resolve_tool_version};
pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, find_config_file};
pub use spec::{
    DEFAULT_FORCE_ENV, DEFAULT_MARKER_PREFIX, DEFAULT_RUNNER, DEFAULT_TOOL, GateConfig,
    LATEST_VERSION, PlannerConfig,
};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
