//! zonepull CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use zonepull_core::tracing::{TracingConfig, init_tracing};

mod cli;
mod commands;
mod config;
mod error;

use cli::{Cli, Command};
use config::Config;
use error::CliResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Export { skip_existing } => {
            commands::export(&config, skip_existing || config.export.skip_existing)
        }
        Command::Domains => commands::domains(&config),
        Command::Zones => commands::zones(&config),
        Command::Records { zone } => commands::records(&config, &zone),
    }
}
