//! Prompts an agent sends to its model.
//!
//! The system prompt carries the persona (role, goal, backstory) and the
//! reply format; the task prompt carries the work itself. Replies follow a
//! ReAct layout:
//!
//! ```text
//! Thought: ...
//! Action: serper_search
//! Action Input: {"search_query": "..."}
//! Observation: <filled in by the runtime>
//! ...
//! Final Answer: ...
//! ```

mod template;

pub use template::{TemplateError, escape_braces, placeholders, render_template, vars};

use crate::tools::SharedTool;

/// The runtime fills in observations; generation stops before the model does.
pub const OBSERVATION_STOP: &str = "\nObservation:";

const PERSONA: &str = "You are {role}. {backstory}\nYour personal goal is: {goal}";

const TOOLS_FORMAT: &str = "\
You ONLY have access to the following tools, and should NEVER make up tools that are not listed here:

{tools}

Use the following format:

Thought: you should always think about what to do
Action: the action to take, only one name of [{tool_names}], just the name, exactly as it's written.
Action Input: the input to the action, just a simple JSON object, enclosed in curly braces, using \" to wrap keys and values.
Observation: the result of the action

Once all necessary information is gathered:

Thought: I now know the final answer
Final Answer: the final answer to the original input question";

const NO_TOOLS_FORMAT: &str = "\
To give my best complete final answer to the task use the exact following format:

Thought: I now can give a great answer
Final Answer: Your final answer must be the great and the most complete as possible, it must be outcome described.

I MUST use these formats, my job depends on it!";

const TASK: &str = "\
Current Task: {description}

This is the expected criteria for your final answer: {expected_output}
you MUST return the actual complete content as the final answer, not a summary.";

const CONTEXT: &str = "\n\nThis is the context you're working with:\n{context}";

const BEGIN: &str = "\n\nBegin! This is VERY important to you, use the tools available and give your best Final Answer, your job depends on it!\n\nThought:";

/// Sent when a reply has neither an action nor a final answer.
pub const FORMAT_REMINDER: &str = "\
I did it wrong. Invalid Format: I missed the 'Action:' after 'Thought:'. I will do right next, and don't use a tool I have already used.

If you don't need to use any more tools, you must give your best complete final answer, make sure it satisfies the expected criteria, use the EXACT format below:

Thought: I now can give a great answer
Final Answer: my best complete final answer to the task.";

/// Sent once the iteration budget is spent.
pub const FORCE_FINAL_ANSWER: &str = "\
Now it's time you MUST give your absolute best final answer. You'll ignore all previous instructions, stop using any tools, and just return your absolute BEST Final answer.

Final Answer:";

/// Persona, tool list and reply format.
pub fn system_prompt(
    role: &str,
    goal: &str,
    backstory: &str,
    tools: &[SharedTool],
) -> Result<String, TemplateError> {
    let persona = render_template(
        PERSONA,
        &vars([("role", role), ("goal", goal), ("backstory", backstory)]),
    )?;

    let format = if tools.is_empty() {
        NO_TOOLS_FORMAT.to_string()
    } else {
        let listing = tools
            .iter()
            .map(|tool| format!("Tool Name: {}\nTool Description: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n\n");
        let names = tools.iter().map(|tool| tool.name()).collect::<Vec<_>>().join(", ");
        render_template(
            TOOLS_FORMAT,
            &vars([("tools", listing), ("tool_names", names)]),
        )?
    };

    Ok(format!("{}\n\n{}", persona, format))
}

/// The task as the agent sees it, with optional output of earlier tasks.
pub fn task_prompt(
    description: &str,
    expected_output: &str,
    context: Option<&str>,
) -> Result<String, TemplateError> {
    let mut prompt = render_template(
        TASK,
        &vars([
            ("description", description.trim()),
            ("expected_output", expected_output.trim()),
        ]),
    )?;

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&render_template(CONTEXT, &vars([("context", context)]))?);
    }

    prompt.push_str(BEGIN);
    Ok(prompt)
}
