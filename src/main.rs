//! Commit gate CLI entrypoint.
//!
//! Prints the verdict signal on stdout (`0` = skip, `1` = deploy). Logs and
//! the report go to stderr. Failures exit with a non-zero status and print
//! nothing on stdout.

use std::path::Path;
use std::process::ExitCode;

use commit_gate::cli::{Cli, OutputFormat, OutputFormatter};
use commit_gate::config::{ConfigParser, ConfigValidator, GateConfig};
use commit_gate::error::Result;
use commit_gate::gate::Gate;
use commit_gate::git::GitCli;
use commit_gate::overrides::{OverrideCheck, OverrideContext};
use commit_gate::planner::{TurboPlanProvider, Verdict};

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose, cli.output);

    // Both git and the planner run one after the other; a single thread is enough
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(verdict) => {
            println!("{}", verdict.signal());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes the logging system on stderr.
fn init_logging(verbose: bool, output: OutputFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match output {
        OutputFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<Verdict> {
    let formatter = OutputFormatter::new(cli.output).with_details(cli.verbose);
    if let Some(banner) = formatter.format_banner() {
        eprintln!("{banner}");
    }

    let config = load_config(&cli)?;

    let repository = GitCli::new(&config.root);
    let context = OverrideContext::capture(&config.force_env, &repository).await?;

    let provider = TurboPlanProvider::from_config(&config);
    let gate = Gate::new(
        &provider,
        &repository,
        OverrideCheck::new(&config.marker_prefix),
    );
    let verdict = gate.decide(&context, &cli.task, &cli.workspace).await?;

    eprintln!("{}", formatter.format_verdict(&verdict));
    Ok(verdict)
}

/// Loads and validates configuration and the invocation arguments.
fn load_config(cli: &Cli) -> Result<GateConfig> {
    let mut config = ConfigParser::load(cli.config.as_deref(), Path::new("."))?;
    if let Some(root) = &cli.root {
        config.root.clone_from(root);
    }
    debug!("Repository root: {}", config.root.display());

    let validator = ConfigValidator::new();
    let result = validator.validate(&config)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }
    validator.validate_invocation(&cli.task, &cli.workspace)?;

    info!(
        task = %cli.task,
        workspace = %cli.workspace,
        "Checking whether the commit affects the task"
    );
    Ok(config)
}
