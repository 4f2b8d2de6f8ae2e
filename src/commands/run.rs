//! Implementation of the `schoolcrew run` command.
//!
//! Asks which kind of task to run, collects the problem or question, and
//! kicks off the matching task with its agent.

use super::indent_continuation;
use crate::cli::RunArgs;
use crate::context::{WorkspaceContext, load_workspace};
use crate::crew::{Crew, TaskOutput};
use crate::dispatch::{Dispatch, Prompter, StdinPrompter, plan_dispatch, select_task};
use crate::error::Result;
use crate::install::ensure_models;
use std::path::Path;

/// Execute the `schoolcrew run` command.
pub fn cmd_run(args: RunArgs, config_override: Option<&Path>) -> Result<()> {
    let (ctx, config) = load_workspace(config_override)?;

    if args.dry_run || args.skip_install_check || !config.install.auto_pull {
        log::debug!("Skipping model install check");
    } else {
        ensure_models(&ctx, &config);
    }

    let crew = Crew::connect(&config)?;
    if let Some(output) = run_with(&ctx, &crew, &mut StdinPrompter, &args)? {
        print_output(&output);
    }
    Ok(())
}

/// Select, plan and (unless dry-running) kick off one task.
///
/// Returns `None` for a dry run.
pub(crate) fn run_with(
    ctx: &WorkspaceContext,
    crew: &Crew,
    prompter: &mut dyn Prompter,
    args: &RunArgs,
) -> Result<Option<TaskOutput>> {
    let choice = select_task(prompter, args.task.as_deref())?;
    let dispatch = plan_dispatch(choice, prompter, crew, args.input.as_deref())?;

    if args.dry_run {
        print_dispatch(&dispatch, crew);
        return Ok(None);
    }

    crew.kickoff_task(ctx, &dispatch.task, &dispatch.inputs)
        .map(Some)
}

fn print_dispatch(dispatch: &Dispatch, crew: &Crew) {
    let role = crew
        .agent(&dispatch.task.agent)
        .map(|agent| agent.role.as_str())
        .unwrap_or("?");

    println!("Dry run: nothing was sent to a model.");
    println!();
    println!("  Choice:      {}", dispatch.choice);
    println!("  Task:        {}", dispatch.task.id);
    println!("  Agent:       {} ({})", dispatch.task.agent, role);
    if dispatch.inputs.is_empty() {
        println!("  Inputs:      (none)");
    } else {
        for (key, value) in &dispatch.inputs {
            println!("  Input:       {} = {}", key, value);
        }
    }
    if let Some(file) = &dispatch.task.output_file {
        println!("  Output file: {}", file);
    }
    println!(
        "  Description: {}",
        indent_continuation(&dispatch_description(dispatch), 15)
    );
}

/// Description as the agent would receive it. Falls back to the raw
/// template when it cannot be rendered.
fn dispatch_description(dispatch: &Dispatch) -> String {
    match dispatch.task.render(&dispatch.inputs) {
        Ok((description, _)) => description,
        Err(e) => {
            log::debug!("Showing unrendered description: {}", e);
            dispatch.task.description.clone()
        }
    }
}

fn print_output(output: &TaskOutput) {
    println!();
    if output.forced {
        println!(
            "⚠️  The agent hit its iteration limit after {} step(s); the answer may be incomplete.",
            output.iterations
        );
    }
    match &output.output_path {
        Some(path) => println!("📄 Answer written to {}", path.display()),
        None => println!("{}", output.raw),
    }
}
