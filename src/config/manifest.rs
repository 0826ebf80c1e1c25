//! Package manifest reading for planner version inference.
//!
//! The planner is launched as `<runner> <tool>@<version>`. Unless the version
//! is pinned in configuration, it is taken from the root `package.json` so the
//! snapshot comes from the same planner the repository builds with.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::{ConfigError, Result};

use super::spec::{GateConfig, LATEST_VERSION};

/// Manifest file name.
const MANIFEST_FILE: &str = "package.json";

/// Subset of `package.json` the gate cares about.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default)]
    dev_dependencies: HashMap<String, String>,
}

/// Reader for the repository root package manifest.
#[derive(Debug, Clone)]
pub struct ManifestReader {
    /// Path to `package.json`.
    path: PathBuf,
}

impl ManifestReader {
    /// Creates a reader for the manifest in the given repository root.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join(MANIFEST_FILE),
        }
    }

    /// Reads the declared version of `tool`.
    ///
    /// Runtime dependencies win over dev dependencies. A manifest that does
    /// not mention the tool yields `latest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn tool_version(&self, tool: &str) -> Result<String> {
        let manifest = self.read().inspect_err(|_| {
            error!("\"{}\" could not be read", self.path.display());
        })?;

        let declared = manifest
            .dependencies
            .get(tool)
            .or_else(|| manifest.dev_dependencies.get(tool));

        match declared {
            Some(version) => {
                info!("Inferred {tool} version \"{version}\" from \"{MANIFEST_FILE}\"");
                Ok(version.clone())
            }
            None => Ok(String::from(LATEST_VERSION)),
        }
    }

    fn read(&self) -> Result<PackageJson> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::Manifest {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        Ok(serde_json::from_str(&raw).map_err(|e| ConfigError::Manifest {
            path: self.path.clone(),
            message: e.to_string(),
        })?)
    }
}

/// Resolves the planner version: pinned configuration first, then the manifest.
///
/// # Errors
///
/// Returns an error if the version is not pinned and the manifest is unreadable.
pub fn resolve_tool_version(config: &GateConfig) -> Result<String> {
    if let Some(version) = &config.planner.version {
        info!("Using pinned {} version \"{version}\"", config.planner.tool);
        return Ok(version.clone());
    }

    ManifestReader::new(&config.root).tool_version(&config.planner.tool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;
    use tempfile::TempDir;

    fn write_manifest(content: &str) -> TempDir {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp.path().join("package.json"), content).expect("Failed to write manifest");
        temp
    }

    #[test]
    fn test_version_from_dependencies() {
        let temp = write_manifest(
            r#"{"dependencies": {"turbo": "^2.1.0"}, "devDependencies": {"turbo": "1.0.0"}}"#,
        );
        let version = ManifestReader::new(temp.path())
            .tool_version("turbo")
            .expect("version should resolve");
        assert_eq!(version, "^2.1.0");
    }

    #[test]
    fn test_version_from_dev_dependencies() {
        let temp = write_manifest(r#"{"name": "root", "devDependencies": {"turbo": "1.13.4"}}"#);
        let version = ManifestReader::new(temp.path())
            .tool_version("turbo")
            .expect("version should resolve");
        assert_eq!(version, "1.13.4");
    }

    #[test]
    fn test_version_defaults_to_latest() {
        let temp = write_manifest(r#"{"name": "root", "private": true}"#);
        let version = ManifestReader::new(temp.path())
            .tool_version("turbo")
            .expect("version should resolve");
        assert_eq!(version, "latest");
    }

    #[test]
    fn test_missing_manifest_is_config_error() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let result = ManifestReader::new(temp.path()).tool_version("turbo");
        assert!(matches!(
            result,
            Err(GateError::Config(ConfigError::Manifest { .. }))
        ));
    }

    #[test]
    fn test_malformed_manifest_is_config_error() {
        let temp = write_manifest("{ not json");
        let result = ManifestReader::new(temp.path()).tool_version("turbo");
        assert!(matches!(
            result,
            Err(GateError::Config(ConfigError::Manifest { .. }))
        ));
    }

    #[test]
    fn test_pinned_version_skips_manifest() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut config = GateConfig {
            root: temp.path().to_path_buf(),
            ..GateConfig::default()
        };
        config.planner.version = Some(String::from("2.0.0"));

        let version = resolve_tool_version(&config).expect("pinned version should resolve");
        assert_eq!(version, "2.0.0");
    }
}
