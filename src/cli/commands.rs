use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::compliance::check;
use crate::config::{load_config_or_default, EnforcerConfig};
use crate::generator::{apply_plan, plan_fixes, AppendFileSink, ArtifactTargets, PreviewSink};
use crate::inspect::load_service;
use crate::report::{render, ReportFormat};
use crate::spec::load_contract;

/// Command-line interface for the contract enforcer
///
/// Compares an implementation against its OpenAPI contract and proposes
/// append-only fixes for what is missing.
#[derive(Debug, Parser)]
#[command(name = "contract-enforcer")]
#[command(about = "Check an API implementation against its OpenAPI contract", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./contract-enforcer.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare the implementation with the contract and print a report
    Check {
        /// OpenAPI document (YAML or JSON)
        #[arg(short, long, env = "ENFORCER_SPEC")]
        spec: Option<PathBuf>,

        /// Service source directory or implementation model manifest
        #[arg(long, env = "ENFORCER_SERVICE")]
        service: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Exit with a non-zero code if the report contains errors
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,
    },
    /// Generate stubs, tests and models for missing endpoints
    ///
    /// Prints a preview unless `--apply` is given. Applying only ever
    /// appends; symbols already present in a target file are left alone.
    Generate {
        /// OpenAPI document (YAML or JSON)
        #[arg(short, long, env = "ENFORCER_SPEC")]
        spec: Option<PathBuf>,

        /// Service source directory or implementation model manifest
        #[arg(long, env = "ENFORCER_SERVICE")]
        service: Option<PathBuf>,

        /// Append the artifacts to their target files
        #[arg(long, default_value_t = false)]
        apply: bool,

        /// Target file for handler stubs, relative to the service root
        #[arg(long)]
        stubs_file: Option<PathBuf>,

        /// Target file for contract tests, relative to the service root
        #[arg(long)]
        tests_file: Option<PathBuf>,

        /// Target file for data models, relative to the service root
        #[arg(long)]
        models_file: Option<PathBuf>,
    },
    /// Print the implementation model discovered for a service as JSON
    Inspect {
        /// Service source directory or implementation model manifest
        #[arg(long, env = "ENFORCER_SERVICE")]
        service: Option<PathBuf>,
    },
}

/// How a successfully executed command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The command ran but found errors it was asked to fail on
    Failed,
}

/// Execute a parsed command line, writing command output to `out`
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file is malformed or an explicit one is missing
/// - No contract or service path is given by flag or configuration
/// - The contract or implementation model cannot be loaded
/// - Rendering or writing artifacts fails
pub fn run_cli(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<CommandStatus> {
    let config = load_config_or_default(cli.config.as_deref())?;

    match &cli.command {
        Commands::Check {
            spec,
            service,
            format,
            fail_on_error,
        } => {
            let spec = required_path(spec.as_deref(), config.spec.as_deref(), "spec")?;
            let service = required_path(service.as_deref(), config.service.as_deref(), "service")?;
            let format = format.or(config.check.format).unwrap_or_default();
            let fail_on_error = *fail_on_error || config.check.fail_on_error;

            let contract = load_contract(spec)?;
            let model = load_service(service)?;
            let report = check(&contract, &model);
            out.write_all(render(&report, format)?.as_bytes())?;

            if fail_on_error && report.error_count() > 0 {
                return Ok(CommandStatus::Failed);
            }
            Ok(CommandStatus::Success)
        }
        Commands::Generate {
            spec,
            service,
            apply,
            stubs_file,
            tests_file,
            models_file,
        } => {
            let spec = required_path(spec.as_deref(), config.spec.as_deref(), "spec")?;
            let service = required_path(service.as_deref(), config.service.as_deref(), "service")?;
            let targets = merge_targets(&config, stubs_file, tests_file, models_file);

            let contract = load_contract(spec)?;
            let model = load_service(service)?;
            let report = check(&contract, &model);
            let plan = plan_fixes(&report, &contract, &model, targets)?;
            out.write_all(plan.summary().as_bytes())?;
            if plan.is_empty() {
                return Ok(CommandStatus::Success);
            }

            if *apply {
                let mut sink = AppendFileSink::new(artifact_root(service)?);
                let summary = apply_plan(&plan, &mut sink)?;
                info!(
                    root = %sink.root().display(),
                    appended = summary.appended,
                    already_present = summary.already_present,
                    "Applied fix plan"
                );
                writeln!(
                    out,
                    "Appended {} artifact(s) under {}; {} already present.",
                    summary.appended,
                    sink.root().display(),
                    summary.already_present
                )?;
            } else {
                let mut sink = PreviewSink::new();
                apply_plan(&plan, &mut sink)?;
                writeln!(out)?;
                out.write_all(sink.as_str().as_bytes())?;
                writeln!(out, "\nDry run: re-run with --apply to append these artifacts.")?;
            }
            Ok(CommandStatus::Success)
        }
        Commands::Inspect { service } => {
            let service = required_path(service.as_deref(), config.service.as_deref(), "service")?;
            let model = load_service(service)?;
            let mut json = serde_json::to_string_pretty(&model)?;
            json.push('\n');
            out.write_all(json.as_bytes())?;
            Ok(CommandStatus::Success)
        }
    }
}

/// A flag value, else the config value, else an error naming both
fn required_path<'a>(
    flag: Option<&'a Path>,
    configured: Option<&'a Path>,
    key: &str,
) -> anyhow::Result<&'a Path> {
    flag.or(configured).with_context(|| {
        format!("No {key} given: pass --{key} or set `{key}` in the config file")
    })
}

fn merge_targets(
    config: &EnforcerConfig,
    stubs_file: &Option<PathBuf>,
    tests_file: &Option<PathBuf>,
    models_file: &Option<PathBuf>,
) -> ArtifactTargets {
    let configured = &config.generate;
    ArtifactTargets {
        stubs_file: stubs_file.clone().unwrap_or_else(|| configured.stubs_file.clone()),
        tests_file: tests_file.clone().unwrap_or_else(|| configured.tests_file.clone()),
        models_file: models_file.clone().unwrap_or_else(|| configured.models_file.clone()),
    }
}

/// Directory artifact targets are resolved against: the service root for a
/// source scan, the working directory for a manifest
fn artifact_root(service: &Path) -> anyhow::Result<PathBuf> {
    if service.is_dir() {
        return Ok(service.to_path_buf());
    }
    std::env::current_dir().context("Failed to resolve the working directory")
}
