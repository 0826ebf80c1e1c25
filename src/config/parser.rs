//! Configuration parser for loading and merging configuration files.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::error::{ConfigError, GateError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::GateConfig;

/// Configuration parser for loading gate configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// A relative `root` in the file is resolved against the base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<GateConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(GateError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            GateError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        let mut config = Self::parse_yaml(&content, Some(path))?;
        if let Some(base) = &self.base_path
            && config.root.is_relative()
        {
            config.root = base.join(&config.root);
        }

        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(content: &str, source: Option<&Path>) -> Result<GateConfig> {
        debug!("Parsing YAML configuration");

        // An empty file means "all defaults"
        if content.trim().is_empty() {
            return Ok(GateConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            GateError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })
    }

    /// Loads configuration from an explicit path, a discovered file, or defaults.
    ///
    /// Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any file is invalid.
    pub fn load(explicit: Option<&Path>, start_dir: impl AsRef<Path>) -> Result<GateConfig> {
        let config_file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(start_dir.as_ref()),
        };

        let mut config = match &config_file {
            Some(path) => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                let parser = Self::new().with_base_path(base);
                parser.load_dotenv()?;
                parser.load_file(path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::new().with_base_path(start_dir.as_ref()).load_dotenv()?;
                GateConfig::default()
            }
        };

        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Variables are read in the form `COMMIT_GATE_<KEY>`.
    pub fn apply_env_overrides(config: &mut GateConfig) {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable lookup.
    fn apply_overrides_from(config: &mut GateConfig, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup("COMMIT_GATE_ROOT") {
            debug!("Overriding root from environment");
            config.root = PathBuf::from(root);
        }

        if let Some(force_env) = lookup("COMMIT_GATE_FORCE_ENV") {
            debug!("Overriding force_env from environment");
            config.force_env = force_env;
        }

        if let Some(prefix) = lookup("COMMIT_GATE_MARKER_PREFIX") {
            debug!("Overriding marker_prefix from environment");
            config.marker_prefix = prefix;
        }

        if let Some(runner) = lookup("COMMIT_GATE_PLANNER_RUNNER") {
            debug!("Overriding planner.runner from environment");
            config.planner.runner = runner;
        }

        if let Some(version) = lookup("COMMIT_GATE_TOOL_VERSION") {
            debug!("Overriding planner.version from environment");
            config.planner.version = Some(version);
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                GateError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "commit-gate.yaml",
    "commit-gate.yml",
    ".commit-gate.yaml",
];

/// Finds the configuration file in the given directory or its parents.
///
/// A relative start directory is resolved first so the search reaches the
/// real ancestors. Returns `None` when no file exists; defaults apply in that
/// case.
#[must_use]
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let start_dir = start_dir.as_ref();
    let mut current =
        std::fs::canonicalize(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
