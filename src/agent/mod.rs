//! Agent runtime.
//!
//! An [`Agent`] is a persona (role, goal, backstory) bound to one model and a
//! set of tools. [`execute`] runs it on a [`TaskBrief`] in a ReAct loop:
//!
//! - **Prompt**: system and task prompts, `{name}` templates
//! - **Parser**: reads `Action:` / `Action Input:` / `Final Answer:` replies
//! - **Executor**: the loop itself, with tool calls and an iteration limit

mod executor;
mod parser;
pub mod prompt;

pub use executor::{TaskBrief, execute};

use crate::config::AgentSettings;
use crate::llm::SharedLlm;
use crate::tools::SharedTool;

/// A configured agent, ready to run tasks.
pub struct Agent {
    pub id: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<SharedTool>,
    pub llm: SharedLlm,
    /// Print each step to stdout.
    pub verbose: bool,
    pub max_iterations: u32,
}

impl Agent {
    pub fn new(id: &str, settings: &AgentSettings, llm: SharedLlm, tools: Vec<SharedTool>) -> Self {
        Self {
            id: id.to_string(),
            role: settings.role.clone(),
            goal: settings.goal.clone(),
            backstory: settings.backstory.clone(),
            tools,
            llm,
            verbose: settings.verbose,
            max_iterations: settings.max_iterations,
        }
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("model", &self.llm.model())
            .field("tools", &self.tool_names())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
