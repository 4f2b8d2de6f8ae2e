//! The agent loop: think, call tools, answer.

use super::Agent;
use super::parser::{AgentStep, parse_reply, tool_name_matches};
use super::prompt::{
    FORCE_FINAL_ANSWER, FORMAT_REMINDER, OBSERVATION_STOP, TemplateError, system_prompt,
    task_prompt,
};
use crate::error::{CrewError, Result};
use crate::llm::{CallOptions, Message};
use crate::tools::ToolInput;

/// What an agent is asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBrief {
    pub description: String,
    pub expected_output: String,
    /// Output of earlier tasks in the same kickoff.
    pub context: Option<String>,
}

/// A tool call made while working on a task.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub tool: String,
    pub input: String,
    pub output: String,
    pub failed: bool,
}

/// Result of running an agent on one task.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub final_answer: String,
    pub tool_calls: Vec<ToolCall>,
    /// Model round-trips, including a forced final answer.
    pub iterations: u32,
    /// The iteration budget ran out and the answer was forced.
    pub forced: bool,
}

fn prompt_error(agent: &Agent, e: TemplateError) -> CrewError {
    CrewError::ConfigError(format!("agent '{}' prompt: {}", agent.id, e))
}

/// Run `agent` on `brief` until it gives a final answer.
///
/// Model failures abort the run. Tool failures and unknown tools are
/// reported back to the model as observations.
pub fn execute(agent: &Agent, brief: &TaskBrief) -> Result<AgentOutcome> {
    let system = system_prompt(&agent.role, &agent.goal, &agent.backstory, &agent.tools)
        .map_err(|e| prompt_error(agent, e))?;
    let task = task_prompt(
        &brief.description,
        &brief.expected_output,
        brief.context.as_deref(),
    )
    .map_err(|e| prompt_error(agent, e))?;

    if agent.verbose {
        println!("\n# Agent: {}", agent.role);
        println!("## Task: {}", brief.description.trim());
    }

    let options = CallOptions::with_stop(&[OBSERVATION_STOP]);
    let mut messages = vec![Message::system(system), Message::user(task)];
    let mut tool_calls = Vec::new();
    let mut iterations = 0;

    while iterations < agent.max_iterations {
        iterations += 1;
        let reply = agent.llm.call(&messages, &options)?;
        log::debug!(
            "Agent '{}' iteration {}: {} chars",
            agent.id,
            iterations,
            reply.len()
        );

        match parse_reply(&reply) {
            AgentStep::FinalAnswer(answer) => {
                if agent.verbose {
                    println!("## Final Answer:\n{}", answer);
                }
                return Ok(AgentOutcome {
                    final_answer: answer,
                    tool_calls,
                    iterations,
                    forced: false,
                });
            }
            AgentStep::Action { tool, input } => {
                let call = run_tool(agent, &tool, &input);
                messages.push(Message::assistant(reply.trim_end()));
                messages.push(Message::user(format!("Observation: {}", call.output)));
                tool_calls.push(call);
            }
            AgentStep::Unparseable => {
                log::info!(
                    "Agent '{}' reply had no action or final answer; reminding it of the format",
                    agent.id
                );
                messages.push(Message::assistant(reply.trim_end()));
                messages.push(Message::user(FORMAT_REMINDER));
            }
        }
    }

    log::warn!(
        "Agent '{}' reached {} iteration(s) without a final answer; forcing one",
        agent.id,
        agent.max_iterations
    );
    messages.push(Message::user(FORCE_FINAL_ANSWER));
    let reply = agent.llm.call(&messages, &CallOptions::default())?;
    iterations += 1;

    let answer = match parse_reply(&reply) {
        AgentStep::FinalAnswer(answer) => answer,
        _ => reply.trim().to_string(),
    };
    if agent.verbose {
        println!("## Final Answer:\n{}", answer);
    }

    Ok(AgentOutcome {
        final_answer: answer,
        tool_calls,
        iterations,
        forced: true,
    })
}

fn run_tool(agent: &Agent, requested: &str, input: &str) -> ToolCall {
    if agent.verbose {
        println!("## Using tool: {}", requested);
        println!("## Tool Input: {}", input);
    }

    let Some(tool) = agent
        .tools
        .iter()
        .find(|tool| tool_name_matches(requested, tool.name()))
    else {
        let available = agent
            .tools
            .iter()
            .map(|tool| tool.name())
            .collect::<Vec<_>>();
        let output = if available.is_empty() {
            format!(
                "Tool '{}' does not exist and you have no tools. Give your Final Answer.",
                requested
            )
        } else {
            format!(
                "Tool '{}' does not exist. Use one of: {}.",
                requested,
                available.join(", ")
            )
        };
        log::info!("Agent '{}' asked for unknown tool '{}'", agent.id, requested);
        return ToolCall {
            tool: requested.to_string(),
            input: input.to_string(),
            output,
            failed: true,
        };
    };

    let (output, failed) = match tool.run(&ToolInput::parse(input)) {
        Ok(output) => (output, false),
        Err(e) => {
            log::warn!("Agent '{}': {}", agent.id, e);
            (format!("Error: {}. Try again with different input.", e), true)
        }
    };

    if agent.verbose {
        println!("## Tool Output:\n{}", output);
    }

    ToolCall {
        tool: tool.name().to_string(),
        input: input.to_string(),
        output,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::SharedLlm;
    use crate::test_support::{EchoTool, ScriptedLlm};
    use std::sync::Arc;

    fn agent_with(llm: Arc<ScriptedLlm>, with_tools: bool, max_iterations: u32) -> Agent {
        let tools: Vec<crate::tools::SharedTool> = if with_tools {
            vec![Arc::new(EchoTool)]
        } else {
            Vec::new()
        };
        Agent {
            id: "tester".to_string(),
            role: "Tester".to_string(),
            goal: "Test things".to_string(),
            backstory: "Has tested before.".to_string(),
            tools,
            llm: llm as SharedLlm,
            verbose: false,
            max_iterations,
        }
    }

    fn brief() -> TaskBrief {
        TaskBrief {
            description: "Say hello.".to_string(),
            expected_output: "A greeting.".to_string(),
            context: None,
        }
    }

    #[test]
    fn test_immediate_final_answer() {
        let llm = Arc::new(ScriptedLlm::new(["Thought: easy\nFinal Answer: Hello!"]));
        let outcome = execute(&agent_with(llm.clone(), false, 5), &brief()).unwrap();

        assert_eq!(outcome.final_answer, "Hello!");
        assert_eq!(outcome.iterations, 1);
        assert!(!outcome.forced);
        assert!(outcome.tool_calls.is_empty());

        let calls = llm.calls();
        assert_eq!(calls[0][0].role.to_string(), "system");
        assert!(calls[0][0].content.starts_with("You are Tester."));
        assert!(calls[0][1].content.starts_with("Current Task: Say hello."));
    }

    #[test]
    fn test_tool_call_then_answer() {
        let llm = Arc::new(ScriptedLlm::new([
            "Thought: use echo\nAction: echo\nAction Input: hi there",
            "Thought: done\nFinal Answer: echoed",
        ]));
        let outcome = execute(&agent_with(llm.clone(), true, 5), &brief()).unwrap();

        assert_eq!(outcome.final_answer, "echoed");
        assert_eq!(outcome.iterations, 2);
        assert_eq!(
            outcome.tool_calls,
            vec![ToolCall {
                tool: "echo".to_string(),
                input: "hi there".to_string(),
                output: "echo: hi there".to_string(),
                failed: false,
            }]
        );

        let second = &llm.calls()[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].role.to_string(), "assistant");
        assert_eq!(second[3].content, "Observation: echo: hi there");
    }

    #[test]
    fn test_tool_failure_becomes_observation() {
        let llm = Arc::new(ScriptedLlm::new([
            "Action: echo\nAction Input: fail",
            "Final Answer: recovered",
        ]));
        let outcome = execute(&agent_with(llm.clone(), true, 5), &brief()).unwrap();

        assert_eq!(outcome.final_answer, "recovered");
        assert!(outcome.tool_calls[0].failed);
        let observation = &llm.calls()[1][3].content;
        assert!(observation.starts_with("Observation: Error: Tool 'echo' failed: asked to fail"));
    }

    #[test]
    fn test_unknown_tool_becomes_observation() {
        let llm = Arc::new(ScriptedLlm::new([
            "Action: firecrawl\nAction Input: x",
            "Final Answer: fine",
        ]));
        let outcome = execute(&agent_with(llm.clone(), true, 5), &brief()).unwrap();

        assert_eq!(outcome.final_answer, "fine");
        assert!(outcome.tool_calls[0].failed);
        assert_eq!(
            llm.calls()[1][3].content,
            "Observation: Tool 'firecrawl' does not exist. Use one of: echo."
        );
    }

    #[test]
    fn test_unparseable_reply_gets_reminder() {
        let llm = Arc::new(ScriptedLlm::new(["hmm, let me think", "Final Answer: ok"]));
        let outcome = execute(&agent_with(llm.clone(), false, 5), &brief()).unwrap();

        assert_eq!(outcome.final_answer, "ok");
        assert_eq!(llm.calls()[1][3].content, FORMAT_REMINDER);
    }

    #[test]
    fn test_iteration_limit_forces_final_answer() {
        let llm = Arc::new(ScriptedLlm::new([
            "Action: echo\nAction Input: one",
            "Action: echo\nAction Input: two",
            "My best answer without the marker",
        ]));
        let outcome = execute(&agent_with(llm.clone(), true, 2), &brief()).unwrap();

        assert!(outcome.forced);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.final_answer, "My best answer without the marker");
        assert_eq!(outcome.tool_calls.len(), 2);

        let last = llm.calls().pop().unwrap();
        assert_eq!(last.last().unwrap().content, FORCE_FINAL_ANSWER);
    }

    #[test]
    fn test_llm_failure_aborts() {
        let llm = Arc::new(ScriptedLlm::new(Vec::<String>::new()));
        let err = execute(&agent_with(llm, false, 3), &brief()).unwrap_err();
        assert!(matches!(err, CrewError::LlmError(_)));
    }

    #[test]
    fn test_context_reaches_task_prompt() {
        let llm = Arc::new(ScriptedLlm::new(["Final Answer: done"]));
        let brief = TaskBrief {
            context: Some("previous findings".to_string()),
            ..brief()
        };
        execute(&agent_with(llm.clone(), false, 1), &brief).unwrap();
        assert!(llm.calls()[0][1].content.contains("previous findings"));
    }
}
