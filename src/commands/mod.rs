//! Command implementations for schoolcrew.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Running without a command is the same as `run`.

mod doctor;
mod init;
mod kickoff;
mod list;
mod run;

use crate::cli::Command;
use crate::error::Result;
use std::path::Path;

/// Dispatch a command to its implementation.
///
/// `config` is the global `--config` override.
pub fn dispatch(command: Option<Command>, config: Option<&Path>) -> Result<()> {
    match command.unwrap_or_default() {
        Command::Run(args) => run::cmd_run(args, config),
        Command::Kickoff(args) => kickoff::cmd_kickoff(args, config),
        Command::Agents => list::cmd_agents(config),
        Command::Tasks => list::cmd_tasks(config),
        Command::Doctor(args) => doctor::cmd_doctor(args, config),
        Command::Init(args) => init::cmd_init(args, config),
    }
}

/// Indent every line after the first by `indent` spaces.
fn indent_continuation(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    text.trim_end()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
