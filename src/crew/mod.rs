//! The crew: agents and tasks, and kicking them off.
//!
//! A kickoff runs tasks one after another. Each task is handed to its agent,
//! the final answer is written to the task's output file, and every step is
//! recorded in the event log. In a full kickoff, earlier answers are passed
//! to later tasks as context.

mod task;

pub use task::Task;

use crate::agent::{self, Agent, TaskBrief};
use crate::config::CrewConfig;
use crate::context::WorkspaceContext;
use crate::env;
use crate::error::{CrewError, Result};
use crate::events::{Event, EventAction, record_event};
use crate::fs::atomic_write_file;
use crate::llm::{SharedLlm, build_llms};
use crate::tools::ToolRegistry;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

/// Result of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutput {
    pub task_id: String,
    pub agent_id: String,
    /// Description as the agent saw it.
    pub description: String,
    /// The agent's final answer.
    pub raw: String,
    /// Where the answer was written, if the task declares an output file.
    pub output_path: Option<PathBuf>,
    pub tool_calls: usize,
    pub iterations: u32,
    /// The agent ran out of iterations and was made to answer.
    pub forced: bool,
}

pub struct Crew {
    agents: BTreeMap<String, Agent>,
    tasks: Vec<Task>,
    verbose: bool,
}

impl Crew {
    /// Group agents and tasks. Every task must belong to an agent of the crew.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>, verbose: bool) -> Result<Self> {
        let agents: BTreeMap<String, Agent> = agents
            .into_iter()
            .map(|agent| (agent.id.clone(), agent))
            .collect();

        for task in &tasks {
            if !agents.contains_key(&task.agent) {
                return Err(CrewError::ConfigError(format!(
                    "task '{}' is assigned to agent '{}', which is not part of the crew",
                    task.id, task.agent
                )));
            }
        }

        Ok(Self {
            agents,
            tasks,
            verbose,
        })
    }

    /// Build the crew described by `config` with the given models and tools.
    pub fn from_config(
        config: &CrewConfig,
        llms: &BTreeMap<String, SharedLlm>,
        tools: &ToolRegistry,
    ) -> Result<Self> {
        let member_ids: Vec<&String> = if config.crew.agents.is_empty() {
            config.agents.keys().collect()
        } else {
            config.crew.agents.iter().collect()
        };

        let mut agents = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            let settings = config.agents.get(id).ok_or_else(|| {
                CrewError::ConfigError(format!("crew lists unknown agent '{}'", id))
            })?;
            let llm = llms.get(&settings.llm).ok_or_else(|| {
                CrewError::ConfigError(format!(
                    "agent '{}' references unknown llm '{}'",
                    id, settings.llm
                ))
            })?;
            let agent_tools = tools.tools_for(&settings.tools)?;
            agents.push(Agent::new(id, settings, llm.clone(), agent_tools));
        }

        let tasks = config
            .ordered_task_ids()
            .into_iter()
            .map(|id| {
                config
                    .tasks
                    .get(id)
                    .map(|settings| Task::new(id, settings))
                    .ok_or_else(|| CrewError::ConfigError(format!("crew lists unknown task '{}'", id)))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(agents, tasks, config.crew.verbose)
    }

    /// Build the crew with Ollama clients and live tools.
    pub fn connect(config: &CrewConfig) -> Result<Self> {
        let llms = build_llms(config)?;
        let tools = ToolRegistry::from_config(config, &llms, env::var(env::SERPER_API_KEY))?;
        Self::from_config(config, &llms, &tools)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks in kickoff order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Run a single task. `task` may be a modified copy of one of the crew's
    /// tasks; its agent must belong to the crew.
    pub fn kickoff_task(
        &self,
        ctx: &WorkspaceContext,
        task: &Task,
        inputs: &BTreeMap<String, String>,
    ) -> Result<TaskOutput> {
        record_event(
            ctx,
            Event::new(EventAction::Kickoff).with_details(json!({
                "tasks": [task.id],
                "inputs": inputs,
            })),
        );

        let output = self.run_task(ctx, task, inputs, None)?;

        record_event(
            ctx,
            Event::new(EventAction::KickoffComplete).with_details(json!({
                "tasks": [task.id],
            })),
        );
        Ok(output)
    }

    /// Run every task in order, feeding earlier answers to later tasks.
    pub fn kickoff(
        &self,
        ctx: &WorkspaceContext,
        inputs: &BTreeMap<String, String>,
    ) -> Result<Vec<TaskOutput>> {
        let task_ids: Vec<&str> = self.tasks.iter().map(|task| task.id.as_str()).collect();
        record_event(
            ctx,
            Event::new(EventAction::Kickoff).with_details(json!({
                "tasks": task_ids,
                "inputs": inputs,
            })),
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let context = (!outputs.is_empty()).then(|| {
                outputs
                    .iter()
                    .map(|output| output.raw.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n----------\n\n")
            });
            outputs.push(self.run_task(ctx, task, inputs, context)?);
        }

        record_event(
            ctx,
            Event::new(EventAction::KickoffComplete).with_details(json!({
                "tasks": task_ids,
            })),
        );
        Ok(outputs)
    }

    fn run_task(
        &self,
        ctx: &WorkspaceContext,
        task: &Task,
        inputs: &BTreeMap<String, String>,
        context: Option<String>,
    ) -> Result<TaskOutput> {
        let agent = self.agents.get(&task.agent).ok_or_else(|| {
            CrewError::ConfigError(format!(
                "task '{}' is assigned to agent '{}', which is not part of the crew",
                task.id, task.agent
            ))
        })?;
        let (description, expected_output) = task.render(inputs)?;

        if self.verbose {
            println!("\n🚀 Task '{}' → {}", task.id, agent.role);
        }
        log::info!("Starting task '{}' with agent '{}'", task.id, agent.id);
        record_event(
            ctx,
            Event::new(EventAction::TaskStart)
                .with_task(&task.id)
                .with_details(json!({
                    "agent": agent.id,
                    "model": agent.llm.model(),
                })),
        );

        let started = Instant::now();
        let outcome = agent::execute(
            agent,
            &TaskBrief {
                description: description.clone(),
                expected_output,
                context,
            },
        )?;

        for call in &outcome.tool_calls {
            record_event(
                ctx,
                Event::new(EventAction::ToolUse)
                    .with_task(&task.id)
                    .with_details(json!({
                        "agent": agent.id,
                        "tool": call.tool,
                        "input": call.input,
                        "failed": call.failed,
                    })),
            );
        }

        let output_path = match &task.output_file {
            Some(file) => {
                let path = ctx.output_path(file);
                atomic_write_file(&path, &format!("{}\n", outcome.final_answer.trim_end()))?;
                Some(path)
            }
            None => None,
        };

        record_event(
            ctx,
            Event::new(EventAction::TaskComplete)
                .with_task(&task.id)
                .with_details(json!({
                    "agent": agent.id,
                    "iterations": outcome.iterations,
                    "forced": outcome.forced,
                    "tool_calls": outcome.tool_calls.len(),
                    "output_file": output_path.as_ref().map(|p| p.display().to_string()),
                    "duration_ms": started.elapsed().as_millis() as u64,
                })),
        );

        if self.verbose {
            match &output_path {
                Some(path) => println!("✅ Task '{}' complete → {}", task.id, path.display()),
                None => println!("✅ Task '{}' complete", task.id),
            }
        }

        Ok(TaskOutput {
            task_id: task.id.clone(),
            agent_id: agent.id.clone(),
            description,
            raw: outcome.final_answer,
            output_path,
            tool_calls: outcome.tool_calls.len(),
            iterations: outcome.iterations,
            forced: outcome.forced,
        })
    }
}

#[cfg(test)]
mod tests;
