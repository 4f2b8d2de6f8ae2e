//! Reading the next step out of a model reply.

use regex::Regex;
use std::sync::LazyLock;

static FINAL_ANSWER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Final Answer\s*:\s*(.*)").expect("Invalid final answer regex"));

static ACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:\s*(.*?)\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(.*)")
        .expect("Invalid action regex")
});

/// What the model asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    /// Call `tool` with `input`.
    Action { tool: String, input: String },
    FinalAnswer(String),
    /// Neither an action nor a final answer.
    Unparseable,
}

/// Parse one reply.
///
/// When a reply holds both an action and a final answer, whichever comes
/// first wins: a final answer after an action was written without seeing
/// the observation.
pub fn parse_reply(reply: &str) -> AgentStep {
    let action = ACTION_REGEX.captures(reply);
    let final_answer = FINAL_ANSWER_REGEX.captures(reply);

    let action_first = match (&action, &final_answer) {
        (Some(a), Some(f)) => a.get(0).map(|m| m.start()) < f.get(0).map(|m| m.start()),
        (Some(_), None) => true,
        _ => false,
    };

    if action_first && let Some(caps) = action {
        let tool = clean_tool_name(caps.get(1).map_or("", |m| m.as_str()));
        let input = clean_action_input(caps.get(2).map_or("", |m| m.as_str()));
        if !tool.is_empty() {
            return AgentStep::Action { tool, input };
        }
    }

    if let Some(caps) = final_answer {
        let answer = caps.get(1).map_or("", |m| m.as_str()).trim();
        if !answer.is_empty() {
            return AgentStep::FinalAnswer(answer.to_string());
        }
    }

    AgentStep::Unparseable
}

/// `[Serper Search]` or `` `serper_search` `` both name `serper_search`.
fn clean_tool_name(raw: &str) -> String {
    raw.lines()
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c: char| matches!(c, '`' | '"' | '\'' | '[' | ']' | '*'))
        .trim()
        .to_string()
}

/// The input ends where a made-up observation or answer begins.
fn clean_action_input(raw: &str) -> String {
    let end = ["\nObservation", "\nThought:", "\nFinal Answer"]
        .iter()
        .filter_map(|marker| raw.find(marker))
        .min()
        .unwrap_or(raw.len());
    raw[..end].trim().to_string()
}

/// Compare a requested tool name with a real one, ignoring case, spaces
/// and dashes.
pub fn tool_name_matches(requested: &str, actual: &str) -> bool {
    let normalize = |name: &str| {
        name.trim()
            .to_lowercase()
            .replace([' ', '-'], "_")
    };
    normalize(requested) == normalize(actual)
}
