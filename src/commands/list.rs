//! Implementation of `schoolcrew agents` and `schoolcrew tasks`.
//!
//! Both read only the config; no model server is contacted.

use crate::config::CrewConfig;
use crate::context::load_workspace;
use crate::error::Result;
use crate::llm::strip_provider;
use std::fmt::Write;
use std::path::Path;

/// Execute the `schoolcrew agents` command.
pub fn cmd_agents(config_override: Option<&Path>) -> Result<()> {
    let (_ctx, config) = load_workspace(config_override)?;
    print!("{}", format_agents(&config));
    Ok(())
}

/// Execute the `schoolcrew tasks` command.
pub fn cmd_tasks(config_override: Option<&Path>) -> Result<()> {
    let (_ctx, config) = load_workspace(config_override)?;
    print!("{}", format_tasks(&config));
    Ok(())
}

fn format_agents(config: &CrewConfig) -> String {
    let mut out = format!("Agents ({}):\n", config.agents.len());

    for (id, agent) in &config.agents {
        let member = config.crew.agents.is_empty() || config.crew.agents.contains(id);
        let model = config
            .llms
            .get(&agent.llm)
            .map(|llm| strip_provider(&llm.model))
            .unwrap_or("?");
        let tools = if agent.tools.is_empty() {
            "(none)".to_string()
        } else {
            agent
                .tools
                .iter()
                .map(|tool| tool.name())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {}{}",
            id,
            if member { "" } else { " (not in crew)" }
        );
        let _ = writeln!(out, "    Role:   {}", agent.role);
        let _ = writeln!(out, "    Goal:   {}", agent.goal.trim());
        let _ = writeln!(out, "    Model:  {} ({})", model, agent.llm);
        let _ = writeln!(out, "    Tools:  {}", tools);
    }
    out
}

fn format_tasks(config: &CrewConfig) -> String {
    let order = config.ordered_task_ids();
    let mut out = format!("Tasks in kickoff order ({}):\n", order.len());

    for (i, id) in order.iter().enumerate() {
        let Some(task) = config.tasks.get(*id) else {
            continue;
        };
        let summary = task.description.trim().lines().next().unwrap_or_default();

        let _ = writeln!(out);
        let _ = writeln!(out, "  {}. {}", i + 1, id);
        let _ = writeln!(out, "     Agent:  {}", task.agent);
        let _ = writeln!(out, "     About:  {}", summary);
        if let Some(file) = &task.output_file {
            let _ = writeln!(out, "     Output: {}", file);
        }
    }

    let unscheduled: Vec<&str> = config
        .tasks
        .keys()
        .map(String::as_str)
        .filter(|id| !order.contains(id))
        .collect();
    if !unscheduled.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Not in kickoff: {}", unscheduled.join(", "));
    }
    out
}
