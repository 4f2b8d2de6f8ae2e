//! Tests for config functionality.

use crate::config::types::ToolKind;
use crate::config::{CODE_MODEL, CrewConfig, GENERAL_MODEL};

#[test]
fn test_default_config_matches_built_in_crew() {
    let config = CrewConfig::default();

    assert_eq!(config.llms["general"].model, GENERAL_MODEL);
    assert_eq!(config.llms["code"].model, CODE_MODEL);
    assert_eq!(config.llms["general"].base_url, "http://localhost:11434");

    let coding = &config.agents["coding"];
    assert_eq!(coding.role, "Senior Software Developer");
    assert_eq!(coding.llm, "code");
    assert_eq!(coding.tools, vec![ToolKind::CodeSearch]);

    let teacher = &config.agents["teacher"];
    assert_eq!(teacher.role, "Skillful Teacher");
    assert_eq!(teacher.llm, "general");
    assert_eq!(
        teacher.tools,
        vec![ToolKind::SerperSearch, ToolKind::WebsiteSearch]
    );

    assert_eq!(config.agents["research"].role, "Research Assistant");

    assert_eq!(
        config.tasks["coding"].output_file.as_deref(),
        Some("full_stack_web_app.py")
    );
    assert_eq!(
        config.tasks["teacher"].output_file.as_deref(),
        Some("comprehensive_lesson_plan.pdf")
    );
    assert_eq!(
        config.tasks["research"].output_file.as_deref(),
        Some("ai_advancements_report.pdf")
    );

    config.validate().unwrap();
}

#[test]
fn test_every_default_task_references_one_agent() {
    let config = CrewConfig::default();
    for (id, task) in &config.tasks {
        assert!(
            config.agents.contains_key(&task.agent),
            "task {} references missing agent",
            id
        );
    }
}

#[test]
fn test_default_coding_task_takes_problem_input() {
    let config = CrewConfig::default();
    assert!(config.tasks["coding"].description.contains("{problem}"));
    assert!(!config.tasks["teacher"].description.contains('{'));
    assert!(!config.tasks["research"].description.contains('{'));
}

#[test]
fn test_parse_empty_yaml_uses_defaults() {
    let config = CrewConfig::from_yaml("").unwrap();
    assert_eq!(config, CrewConfig::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
crew:
  output_dir: out
install:
  auto_pull: false
"#;
    let config = CrewConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.crew.output_dir, "out");
    assert!(!config.install.auto_pull);

    // Unspecified sections keep the built-in crew
    assert_eq!(config.agents.len(), 3);
    assert_eq!(config.install.command, "ollama pull {model}");
}

#[test]
fn test_parse_custom_crew() {
    let yaml = r#"
llms:
  local:
    model: "ollama/llama3.1"
    temperature: 0.2
agents:
  poet:
    role: "Poet"
    goal: "Write short poems"
    backstory: "Loves haiku."
    llm: local
    verbose: false
tasks:
  haiku:
    description: "Write a haiku about {topic}"
    expected_output: "Three lines"
    agent: poet
crew:
  agents: [poet]
  tasks: [haiku]
"#;
    let config = CrewConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.llms.len(), 1);
    let local = &config.llms["local"];
    assert_eq!(local.base_url, "http://localhost:11434");
    assert_eq!(local.temperature, Some(0.2));
    assert_eq!(local.max_retries, 3);

    let poet = &config.agents["poet"];
    assert!(!poet.verbose);
    assert!(poet.tools.is_empty());
    assert_eq!(poet.max_iterations, 15);

    assert_eq!(config.tasks["haiku"].output_file, None);
    assert_eq!(config.ordered_task_ids(), vec!["haiku"]);
}

#[test]
fn test_unknown_tool_fails() {
    let yaml = r#"
agents:
  coding:
    role: "Dev"
    goal: "Code"
    backstory: "Codes."
    llm: code
    tools: [firecrawl_scrape]
tasks: {}
crew:
  agents: [coding]
  tasks: []
"#;
    let result = CrewConfig::from_yaml(yaml);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("failed to parse"));
}

#[test]
fn test_task_with_unknown_agent_fails() {
    let yaml = r#"
tasks:
  orphan:
    description: "Do things"
    expected_output: "Things"
    agent: ghost
"#;
    let result = CrewConfig::from_yaml(yaml);
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("unknown agent 'ghost'"));
}

#[test]
fn test_task_with_empty_agent_fails() {
    let yaml = r#"
tasks:
  orphan:
    description: "Do things"
    expected_output: "Things"
    agent: ""
crew:
  tasks: [orphan]
"#;
    let result = CrewConfig::from_yaml(yaml);
    assert!(result.unwrap_err().to_string().contains("not bound to an agent"));
}

#[test]
fn test_agent_with_unknown_llm_fails() {
    let mut config = CrewConfig::default();
    config.agents.get_mut("teacher").unwrap().llm = "gpt".to_string();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("unknown llm 'gpt'"));
}

#[test]
fn test_zero_iterations_fails() {
    let mut config = CrewConfig::default();
    config.agents.get_mut("coding").unwrap().max_iterations = 0;
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("max_iterations of 0"));
}

#[test]
fn test_zero_llm_timeout_fails() {
    let mut config = CrewConfig::default();
    config.llms.get_mut("general").unwrap().timeout_seconds = 0;
    assert!(config.validate().unwrap_err().to_string().contains("timeout_seconds of 0"));
}

#[test]
fn test_llm_retries_are_bounded() {
    let mut config = CrewConfig::default();
    config.llms.get_mut("code").unwrap().max_retries = 10;
    config.validate().unwrap();

    config.llms.get_mut("code").unwrap().max_retries = 40;
    let err = config.validate().unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
    assert!(err.to_string().contains("max_retries of 40"));
}

#[test]
fn test_code_search_llm_must_exist() {
    let mut config = CrewConfig::default();
    config.tools.code_search.llm = "missing".to_string();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("tools.code_search"));
}

#[test]
fn test_crew_lists_unknown_task_fails() {
    let mut config = CrewConfig::default();
    config.crew.tasks.push("homework".to_string());
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("unknown task 'homework'"));
}

#[test]
fn test_ordered_task_ids_follow_crew_order() {
    let config = CrewConfig::default();
    assert_eq!(
        config.ordered_task_ids(),
        vec!["coding", "teacher", "research"]
    );

    let mut config = CrewConfig::default();
    config.crew.tasks.clear();
    // Falls back to id order
    assert_eq!(
        config.ordered_task_ids(),
        vec!["coding", "research", "teacher"]
    );
}

#[test]
fn test_override_base_url() {
    let mut config = CrewConfig::default();
    config.override_base_url("http://gpu-box:11434/");
    for llm in config.llms.values() {
        assert_eq!(llm.base_url, "http://gpu-box:11434");
    }
}

#[test]
fn test_forward_compatibility() {
    let yaml = r#"
future_section:
  enabled: true
agents:
  coding:
    role: "Dev"
    goal: "Code"
    backstory: "Codes."
    llm: code
    allow_delegation: false
tasks: {}
crew:
  agents: [coding]
  tasks: []
"#;
    let config = CrewConfig::from_yaml(yaml).unwrap();
    assert!(config.extra.contains_key("future_section"));
    assert!(config.agents["coding"].extra.contains_key("allow_delegation"));
}

#[test]
fn test_yaml_roundtrip_keeps_crew() {
    let config = CrewConfig::default();
    let yaml = config.to_yaml().unwrap();
    let reparsed = CrewConfig::from_yaml(&yaml).unwrap();
    assert_eq!(reparsed, config);
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = CrewConfig::load_or_default(dir.path().join("crew.yaml")).unwrap();
    assert_eq!(config, CrewConfig::default());
}

#[test]
fn test_load_reads_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "crew:\n  verbose: false").unwrap();

    let config = CrewConfig::load(file.path()).unwrap();
    assert!(!config.crew.verbose);
}

#[test]
fn test_load_invalid_yaml_is_config_error() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "agents: [not, a, map]").unwrap();

    let err = CrewConfig::load(file.path()).unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
}
