//! Tests for crew construction and kickoff.

use super::*;
use crate::agent::prompt::vars;
use crate::events::read_events;
use crate::test_support::{ScriptedLlm, test_workspace};
use std::sync::Arc;

struct Fixture {
    crew: Crew,
    code: Arc<ScriptedLlm>,
    general: Arc<ScriptedLlm>,
}

fn quiet_config() -> CrewConfig {
    let mut config = CrewConfig::default();
    config.crew.verbose = false;
    for agent in config.agents.values_mut() {
        agent.verbose = false;
    }
    config
}

fn fixture(code_replies: &[&str], general_replies: &[&str]) -> Fixture {
    let config = quiet_config();
    let code = Arc::new(ScriptedLlm::new(code_replies.iter().copied()));
    let general = Arc::new(ScriptedLlm::new(general_replies.iter().copied()));

    let llms: BTreeMap<String, SharedLlm> = BTreeMap::from([
        ("code".to_string(), code.clone() as SharedLlm),
        ("general".to_string(), general.clone() as SharedLlm),
    ]);
    let tools = ToolRegistry::from_config(&config, &llms, None).unwrap();
    let crew = Crew::from_config(&config, &llms, &tools).unwrap();

    Fixture {
        crew,
        code,
        general,
    }
}

fn actions(ctx: &WorkspaceContext) -> Vec<EventAction> {
    read_events(ctx)
        .unwrap()
        .into_iter()
        .map(|event| event.action)
        .collect()
}

#[test]
fn test_from_config_builds_default_crew() {
    let f = fixture(&[], &[]);

    let ids: Vec<&str> = f.crew.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["coding", "teacher", "research"]);

    let coding = f.crew.agent("coding").unwrap();
    assert_eq!(coding.tool_names(), vec!["code_search"]);
    let teacher = f.crew.agent("teacher").unwrap();
    assert_eq!(teacher.tool_names(), vec!["serper_search", "website_search"]);
    assert!(f.crew.agent("research").is_some());
}

#[test]
fn test_kickoff_task_writes_output_and_events() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(&["Thought: easy\nFinal Answer: def reverse(s):\n    return s[::-1]"], &[]);

    let task = f.crew.task("coding").unwrap().clone();
    let output = f
        .crew
        .kickoff_task(&ctx, &task, &vars([("problem", "reverse a string")]))
        .unwrap();

    assert_eq!(output.task_id, "coding");
    assert_eq!(output.agent_id, "coding");
    assert!(output.description.ends_with("Student's problem: reverse a string"));
    assert_eq!(output.raw, "def reverse(s):\n    return s[::-1]");

    let path = output.output_path.unwrap();
    assert_eq!(path, ctx.output_dir.join("full_stack_web_app.py"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "def reverse(s):\n    return s[::-1]\n"
    );

    assert_eq!(
        actions(&ctx),
        vec![
            EventAction::Kickoff,
            EventAction::TaskStart,
            EventAction::TaskComplete,
            EventAction::KickoffComplete
        ]
    );

    // The problem reached the coding model
    let prompt = &f.code.calls()[0][1].content;
    assert!(prompt.contains("Student's problem: reverse a string"));
    assert!(f.general.calls().is_empty());
}

#[test]
fn test_tool_calls_are_logged() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(
        &[
            "Action: code_search\nAction Input: {\"input\": \"string reversal\"}",
            "Final Answer: s[::-1]",
        ],
        &["Use slicing: s[::-1]"],
    );

    let task = f.crew.task("coding").unwrap().clone();
    let output = f
        .crew
        .kickoff_task(&ctx, &task, &vars([("problem", "reverse")]))
        .unwrap();
    assert_eq!(output.tool_calls, 1);

    let events = read_events(&ctx).unwrap();
    let tool_use = events
        .iter()
        .find(|e| e.action == EventAction::ToolUse)
        .unwrap();
    assert_eq!(tool_use.task.as_deref(), Some("coding"));
    assert_eq!(tool_use.details["tool"], "code_search");
    assert_eq!(tool_use.details["failed"], false);

    // code_search forwards to the general model
    assert_eq!(f.general.calls()[0][0].content, "string reversal");
}

#[test]
fn test_kickoff_task_with_question_prefix() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(&[], &["Final Answer: Lesson plan"]);

    let task = f
        .crew
        .task("teacher")
        .unwrap()
        .clone()
        .with_question_prefix("How do I add 1/2 and 1/3?");
    let output = f.crew.kickoff_task(&ctx, &task, &BTreeMap::new()).unwrap();

    assert!(output.description.starts_with("Question: How do I add 1/2 and 1/3?\n"));
    let prompt = &f.general.calls()[0][1].content;
    assert!(prompt.starts_with("Current Task: Question: How do I add 1/2 and 1/3?\n"));
    assert!(ctx.output_dir.join("comprehensive_lesson_plan.pdf").exists());
}

#[test]
fn test_missing_input_fails_before_model_call() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(&["Final Answer: never"], &[]);

    let task = f.crew.task("coding").unwrap().clone();
    let err = f.crew.kickoff_task(&ctx, &task, &BTreeMap::new()).unwrap_err();

    assert!(matches!(err, CrewError::UserError(_)));
    assert!(f.code.calls().is_empty());
    assert!(!ctx.output_dir.join("full_stack_web_app.py").exists());
    assert_eq!(actions(&ctx), vec![EventAction::Kickoff]);
}

#[test]
fn test_full_kickoff_passes_context_forward() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(
        &["Final Answer: CODE"],
        &["Final Answer: LESSON", "Final Answer: REPORT"],
    );

    let outputs = f.crew.kickoff(&ctx, &vars([("problem", "fizzbuzz")])).unwrap();
    let raws: Vec<&str> = outputs.iter().map(|o| o.raw.as_str()).collect();
    assert_eq!(raws, vec!["CODE", "LESSON", "REPORT"]);

    let calls = f.general.calls();
    assert!(calls[0][1].content.contains("context you're working with:\nCODE"));
    assert!(calls[1][1].content.contains("CODE\n\n----------\n\nLESSON"));

    let actions = actions(&ctx);
    assert_eq!(actions.first(), Some(&EventAction::Kickoff));
    assert_eq!(actions.last(), Some(&EventAction::KickoffComplete));
    assert_eq!(
        actions.iter().filter(|a| **a == EventAction::TaskComplete).count(),
        3
    );
}

#[test]
fn test_llm_failure_propagates() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(&[], &[]);

    let task = f.crew.task("research").unwrap().clone();
    let err = f.crew.kickoff_task(&ctx, &task, &BTreeMap::new()).unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::LLM_FAILURE);
    assert!(!ctx.output_dir.join("ai_advancements_report.pdf").exists());
}

#[test]
fn test_task_without_output_file() {
    let (_temp, ctx) = test_workspace();
    let f = fixture(&[], &["Final Answer: short"]);

    let mut task = f.crew.task("research").unwrap().clone();
    task.output_file = None;
    let output = f.crew.kickoff_task(&ctx, &task, &BTreeMap::new()).unwrap();
    assert_eq!(output.output_path, None);
}

#[test]
fn test_task_agent_must_be_in_crew() {
    let mut config = quiet_config();
    config.crew.agents = vec!["coding".to_string(), "teacher".to_string()];

    let llms: BTreeMap<String, SharedLlm> = config
        .llms
        .keys()
        .map(|name| {
            (
                name.clone(),
                Arc::new(ScriptedLlm::new(Vec::<String>::new())) as SharedLlm,
            )
        })
        .collect();
    let tools = ToolRegistry::from_config(&config, &llms, None).unwrap();

    let err = Crew::from_config(&config, &llms, &tools).err().unwrap();
    assert!(
        err.to_string()
            .contains("task 'research' is assigned to agent 'research', which is not part of the crew")
    );
}
