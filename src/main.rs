use clap::Parser;
use contract_enforcer::cli::{run_cli, Cli, CommandStatus};
use contract_enforcer::logging::{init_logging_with_config, LogConfig};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    init_logging_with_config(&LogConfig::from_env())?;
    let cli = Cli::parse();

    let mut stdout = std::io::stdout().lock();
    Ok(match run_cli(&cli, &mut stdout)? {
        CommandStatus::Success => ExitCode::SUCCESS,
        CommandStatus::Failed => ExitCode::FAILURE,
    })
}
