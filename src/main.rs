use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod domain;
mod services;

use cli::Cli;
use domain::constants::EXIT_INDETERMINATE;
use domain::errors::CheckError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    services::logging::init_logging(cli.verbose);

    match commands::dispatch(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let code = classify(&e);
            tracing::error!(exit_code = code, "{e:#}");
            ExitCode::from(code)
        }
    }
}

/// Unclassified failures stay silent (exit 2) rather than raising an alert.
fn classify(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<CheckError>()
        .map(CheckError::exit_code)
        .unwrap_or(EXIT_INDETERMINATE)
}
