//! Schoolcrew: a crew of local LLM agents for coding, teaching and research.
//!
//! This is the main entry point for the `schoolcrew` CLI. It loads the
//! environment, sets up logging, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

mod agent;
mod cli;
mod commands;
pub mod config;
pub mod context;
mod crew;
mod dispatch;
pub mod env;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
mod install;
mod llm;
mod logging;
mod tools;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Logging first so .env loading can report what it found
    logging::init(cli.verbose);

    let result = env::load_env_file(cli.env_file.as_deref())
        .and_then(|_| commands::dispatch(cli.command, cli.config.as_deref()));

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
