//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `check.rs`: the fetch-verify-diff run and its exit code.
//! - `inspect.rs`: read-only helpers (`variants`, `state`).
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod check;
pub mod inspect;

use crate::cli::{Cli, Commands};
use crate::services::config;

pub use check::handle_check;
pub use inspect::{handle_state, handle_variants};

/// Runs the selected command and returns the process exit code.
pub fn dispatch(cli: &Cli) -> anyhow::Result<u8> {
    let file = config::load_file(cli.config.as_deref())?;
    match cli.command.as_ref().unwrap_or(&Commands::Check) {
        Commands::Check => handle_check(cli, &file),
        Commands::Variants { phrase } => handle_variants(cli, &file, phrase),
        Commands::State => handle_state(cli, &file),
    }
}
