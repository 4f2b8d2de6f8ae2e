//! Implementation of the `schoolcrew kickoff` command.
//!
//! Runs every task of the crew in order with the given inputs. Inputs are
//! checked against every task's placeholders before the first model call,
//! so a forgotten `--input` does not surface halfway through a run.

use crate::cli::KickoffArgs;
use crate::context::load_workspace;
use crate::crew::Crew;
use crate::error::{CrewError, Result};
use crate::install::ensure_models;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Execute the `schoolcrew kickoff` command.
pub fn cmd_kickoff(args: KickoffArgs, config_override: Option<&Path>) -> Result<()> {
    let (ctx, config) = load_workspace(config_override)?;
    let crew = Crew::connect(&config)?;

    let inputs = collect_inputs(args.inputs);
    check_inputs(&crew, &inputs)?;

    if !args.skip_install_check && config.install.auto_pull {
        ensure_models(&ctx, &config);
    }

    let outputs = crew.kickoff(&ctx, &inputs)?;

    println!();
    println!("Kickoff complete ({} task(s)):", outputs.len());
    for output in &outputs {
        let target = output
            .output_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(no output file)".to_string());
        let forced = if output.forced { " [iteration limit]" } else { "" };
        println!("  {:<10} {}{}", output.task_id, target, forced);
    }
    Ok(())
}

/// Later occurrences of a key win.
fn collect_inputs(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

/// Fail if any task of the crew needs an input that was not given.
fn check_inputs(crew: &Crew, inputs: &BTreeMap<String, String>) -> Result<()> {
    let mut missing = BTreeSet::new();
    for task in crew.tasks() {
        for name in task.required_inputs()? {
            if !inputs.contains_key(&name) {
                missing.insert(name);
            }
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let flags = missing
        .iter()
        .map(|name| format!("--input {}=...", name))
        .collect::<Vec<_>>()
        .join(" ");
    Err(CrewError::UserError(format!(
        "kickoff needs input(s): {}\nFix: schoolcrew kickoff {}",
        missing.into_iter().collect::<Vec<_>>().join(", "),
        flags
    )))
}
