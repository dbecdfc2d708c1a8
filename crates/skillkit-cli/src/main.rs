mod cli;
mod commands;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Load configuration
    let settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = if cli.verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    skillkit_logging::init_logging(level)?;

    commands::execute(cli.command, &settings)
}
