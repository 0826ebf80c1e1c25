//! Plan snapshot providers.
//!
//! The gate never builds task graphs itself. It asks a planner for a dry run of
//! `task` filtered to `workspace` and reads back the ordered task list.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{GateConfig, resolve_tool_version};
use crate::error::{ProviderError, Result};

use super::snapshot::PlanSnapshot;

/// Source of plan snapshots for the current repository state.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Fetches the plan for `task` scoped to `workspace`.
    ///
    /// Fails if the planner fails or the workspace is not in the plan; never
    /// returns a partial plan.
    async fn fetch_plan(&self, task: &str, workspace: &str) -> Result<PlanSnapshot>;
}

/// Program and leading arguments that launch the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannerCommand {
    program: String,
    prefix_args: Vec<String>,
}

impl PlannerCommand {
    fn args(&self, task: &str, workspace: &str) -> Vec<String> {
        let mut args = self.prefix_args.clone();
        args.extend([
            String::from("run"),
            task.to_string(),
            format!("--filter={workspace}"),
            String::from("--dry=json"),
        ]);
        args
    }

    fn command_line(&self, task: &str, workspace: &str) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args(task, workspace));
        parts.join(" ")
    }
}

/// How the planner launch command is obtained.
#[derive(Debug)]
enum Launcher {
    /// Program and arguments known up front.
    Fixed(PlannerCommand),
    /// `<runner> <tool>@<version>`, version resolved on first use.
    Versioned {
        config: GateConfig,
        resolved: OnceLock<PlannerCommand>,
    },
}

/// Provider that shells out to the Turborepo dry-run planner.
///
/// When built from configuration without a custom command, the planner
/// version is resolved on the first fetch and reused afterwards.
#[derive(Debug)]
pub struct TurboPlanProvider {
    /// Directory the planner runs in.
    root: PathBuf,
    /// Launch command source.
    launcher: Launcher,
}

impl TurboPlanProvider {
    /// Creates a provider running `program prefix_args.. run <task> ...` in `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, program: impl Into<String>, prefix_args: Vec<String>) -> Self {
        Self {
            root: root.into(),
            launcher: Launcher::Fixed(PlannerCommand {
                program: program.into(),
                prefix_args,
            }),
        }
    }

    /// Creates a provider for the configured repository root.
    ///
    /// A custom `planner.command` replaces `<runner> <tool>@<version>`
    /// entirely and never reads the package manifest.
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        match config.planner.command.as_deref() {
            Some([program, rest @ ..]) => Self::new(&config.root, program.clone(), rest.to_vec()),
            _ => Self {
                root: config.root.clone(),
                launcher: Launcher::Versioned {
                    config: config.clone(),
                    resolved: OnceLock::new(),
                },
            },
        }
    }

    /// Returns the launch command, resolving the planner version on first use.
    fn planner_command(&self) -> Result<&PlannerCommand> {
        match &self.launcher {
            Launcher::Fixed(command) => Ok(command),
            Launcher::Versioned { config, resolved } => {
                if let Some(command) = resolved.get() {
                    return Ok(command);
                }

                let version = resolve_tool_version(config)?;
                Ok(resolved.get_or_init(|| PlannerCommand {
                    program: config.planner.runner.clone(),
                    prefix_args: vec![config.planner.tool_spec(&version)],
                }))
            }
        }
    }
}

#[async_trait]
impl PlanProvider for TurboPlanProvider {
    async fn fetch_plan(&self, task: &str, workspace: &str) -> Result<PlanSnapshot> {
        let planner = self.planner_command()?;
        let command = planner.command_line(task, workspace);
        info!("Analyzing results of `{command}`");

        let output = Command::new(&planner.program)
            .args(planner.args(task, workspace))
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ProviderError::Spawn {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let snapshot = PlanSnapshot::from_json(&stdout)?;
        snapshot.ensure_workspace(workspace)?;

        debug!(
            "Plan for {workspace}: {} packages, tasks {:?}",
            snapshot.packages.len(),
            snapshot.task_ids()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, GateError};
    use std::path::Path;
    use tempfile::TempDir;

    const PLAN: &str = r#"{"packages":["ui","web"],"tasks":[
        {"taskId":"ui#build","task":"build","package":"ui","hash":"aaa"},
        {"taskId":"web#build","task":"build","package":"web","hash":"bbb"}]}"#;

    fn shell_provider(root: &Path, script: &str) -> TurboPlanProvider {
        TurboPlanProvider::new(root, "sh", vec![String::from("-c"), script.to_string()])
    }

    fn pinned_config(root: &Path, version: &str) -> GateConfig {
        let mut config = GateConfig {
            root: root.to_path_buf(),
            ..GateConfig::default()
        };
        config.planner.version = Some(version.to_string());
        config
    }

    #[test]
    fn test_default_command_line() {
        let provider = TurboPlanProvider::from_config(&pinned_config(Path::new("/repo"), "2.1.3"));
        let command = provider.planner_command().expect("command should resolve");
        assert_eq!(
            command.command_line("build", "web"),
            "bunx turbo@2.1.3 run build --filter=web --dry=json"
        );
        assert_eq!(provider.root, PathBuf::from("/repo"));
    }

    #[test]
    fn test_custom_command_replaces_runner() {
        let mut config = GateConfig {
            root: PathBuf::from("/missing/manifest"),
            ..GateConfig::default()
        };
        config.planner.command = Some(vec![
            String::from("pnpm"),
            String::from("exec"),
            String::from("turbo"),
        ]);

        let provider = TurboPlanProvider::from_config(&config);
        let command = provider
            .planner_command()
            .expect("custom command needs no manifest");
        assert_eq!(command.program, "pnpm");
        assert_eq!(
            command.args("deploy", "api"),
            vec!["exec", "turbo", "run", "deploy", "--filter=api", "--dry=json"]
        );
    }

    #[test]
    fn test_version_inferred_from_manifest_once() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let manifest = temp.path().join("package.json");
        std::fs::write(&manifest, r#"{"devDependencies": {"turbo": "1.13.4"}}"#)
            .expect("Failed to write manifest");

        let config = GateConfig {
            root: temp.path().to_path_buf(),
            ..GateConfig::default()
        };
        let provider = TurboPlanProvider::from_config(&config);
        let first = provider
            .planner_command()
            .expect("command should resolve")
            .clone();

        // The resolved command survives the manifest changing
        std::fs::remove_file(&manifest).expect("Failed to remove manifest");
        let second = provider.planner_command().expect("command should be cached");

        assert_eq!(first.prefix_args, vec!["turbo@1.13.4"]);
        assert_eq!(&first, second);
    }

    #[tokio::test]
    async fn test_unreadable_manifest_fails_fetch_as_config_error() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = GateConfig {
            root: temp.path().to_path_buf(),
            ..GateConfig::default()
        };

        let provider = TurboPlanProvider::from_config(&config);
        let err = provider.fetch_plan("build", "web").await.unwrap_err();

        assert!(matches!(err, GateError::Config(ConfigError::Manifest { .. })));
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_fetch_plan_parses_output() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp.path().join("plan.json"), PLAN).expect("Failed to write plan");

        let provider = shell_provider(temp.path(), "cat plan.json");
        let snapshot = provider
            .fetch_plan("build", "web")
            .await
            .expect("plan should be fetched");

        assert_eq!(snapshot.task_ids(), vec!["ui#build", "web#build"]);
    }

    #[tokio::test]
    async fn test_fetch_plan_missing_workspace() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp.path().join("plan.json"), PLAN).expect("Failed to write plan");

        let provider = shell_provider(temp.path(), "cat plan.json");
        let err = provider.fetch_plan("build", "docs").await.unwrap_err();

        assert!(err.is_workspace_not_found());
    }

    #[tokio::test]
    async fn test_fetch_plan_command_failure() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let provider = shell_provider(temp.path(), "echo 'no lockfile' >&2; exit 3");

        let err = provider.fetch_plan("build", "web").await.unwrap_err();
        match err {
            GateError::Provider(ProviderError::CommandFailed { status, stderr, .. }) => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "no lockfile");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_plan_invalid_json() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let provider = shell_provider(temp.path(), "echo '• Packages in scope: web'");

        let err = provider.fetch_plan("build", "web").await.unwrap_err();
        assert!(matches!(
            err,
            GateError::Provider(ProviderError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_plan_missing_program() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let provider = TurboPlanProvider::new(temp.path(), "definitely-not-a-planner-binary", vec![]);

        let err = provider.fetch_plan("build", "web").await.unwrap_err();
        assert!(matches!(err, GateError::Provider(ProviderError::Spawn { .. })));
    }
}
