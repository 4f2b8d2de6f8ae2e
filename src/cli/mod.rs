//! CLI argument parsing for schoolcrew.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Schoolcrew: a crew of local LLM agents for coding, teaching and research.
///
/// Pick a task interactively and the matching agent works on it with its
/// tools, writing the final answer to the task's output file.
#[derive(Parser, Debug)]
#[command(name = "schoolcrew")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Crew configuration file (default: $SCHOOLCREW_CONFIG or ./crew.yaml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Load environment variables from this file instead of ./.env.
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// More diagnostic output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands for schoolcrew.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select a task and dispatch it to its agent.
    ///
    /// Prompts for coding, theoretical or research unless --task is given.
    Run(RunArgs),

    /// Run every task of the crew in order.
    ///
    /// Later tasks see the answers of earlier ones as context.
    Kickoff(KickoffArgs),

    /// List the crew's agents.
    Agents,

    /// List the crew's tasks.
    Tasks,

    /// Check configuration, API keys and the model server.
    Doctor(DoctorArgs),

    /// Write the built-in crew to crew.yaml.
    Init(InitArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Run(RunArgs::default())
    }
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Task to run (coding, theoretical or research) instead of prompting.
    #[arg(long)]
    pub task: Option<String>,

    /// The coding problem or teacher question instead of prompting.
    #[arg(long)]
    pub input: Option<String>,

    /// Show what would be dispatched without calling any model.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not check for (and install) missing models first.
    #[arg(long)]
    pub skip_install_check: bool,
}

/// Arguments for the `kickoff` command.
#[derive(Args, Debug, Default, Clone)]
pub struct KickoffArgs {
    /// Task input as key=value (repeatable), e.g. --input problem="fizzbuzz".
    #[arg(long = "input", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub inputs: Vec<(String, String)>,

    /// Do not check for (and install) missing models first.
    #[arg(long)]
    pub skip_install_check: bool,
}

/// Arguments for the `doctor` command.
#[derive(Args, Debug, Default, Clone)]
pub struct DoctorArgs {
    /// Pull missing models with the configured install command.
    #[arg(long)]
    pub install: bool,
}

/// Arguments for the `init` command.
#[derive(Args, Debug, Default, Clone)]
pub struct InitArgs {
    /// Overwrite an existing crew.yaml.
    #[arg(long)]
    pub force: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
