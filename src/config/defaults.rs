//! The built-in crew: two local models, three agents, three tasks.

use super::types::{AgentSettings, LlmSettings, TaskSettings, ToolKind};
use std::collections::BTreeMap;

pub const GENERAL_MODEL: &str = "ollama/mistral:latest";
pub const CODE_MODEL: &str = "ollama/deepseek-coder:6.7b";

pub(crate) fn llms() -> BTreeMap<String, LlmSettings> {
    BTreeMap::from([
        ("general".to_string(), LlmSettings::new(GENERAL_MODEL)),
        ("code".to_string(), LlmSettings::new(CODE_MODEL)),
    ])
}

pub(crate) fn agents() -> BTreeMap<String, AgentSettings> {
    BTreeMap::from([
        (
            "coding".to_string(),
            agent(
                "Senior Software Developer",
                "Craft well-structured, optimized, and bug-free Python code.",
                "You are a top-tier Python developer with expertise in clean code, debugging, and best practices.",
                vec![ToolKind::CodeSearch],
                "code",
            ),
        ),
        (
            "teacher".to_string(),
            agent(
                "Skillful Teacher",
                "Teach complex subjects in an easy-to-understand way.",
                "A passionate teacher who explains math, social science, and computer science in the simplest way.",
                vec![ToolKind::SerperSearch, ToolKind::WebsiteSearch],
                "general",
            ),
        ),
        (
            "research".to_string(),
            agent(
                "Research Assistant",
                "Gather and summarize the latest advancements in AI technology.",
                "An AI research assistant skilled in analyzing and summarizing key tech developments.",
                vec![ToolKind::SerperSearch, ToolKind::WebsiteSearch],
                "general",
            ),
        ),
    ])
}

pub(crate) fn tasks() -> BTreeMap<String, TaskSettings> {
    BTreeMap::from([
        (
            "coding".to_string(),
            task(
                "Using input from the Student, analyze the question and provide an optimized Python solution.\n\
                 The code should be well-documented, easy to understand, and efficient.\n\
                 Provide a brief explanation of the code and its workings using comments.\n\
                 \n\
                 Student's problem: {problem}",
                "A clean, optimized, and well-documented Python solution with explanations.",
                "full_stack_web_app.py",
                "coding",
            ),
        ),
        (
            "teacher".to_string(),
            task(
                "Create a 15-minute math lesson plan on fractions.\n\
                 Include clear objectives, an outline, interactive activities, assessment methods, and teaching strategies.",
                "A structured lesson plan on fractions with clear learning objectives.",
                "comprehensive_lesson_plan.pdf",
                "teacher",
            ),
        ),
        (
            "research".to_string(),
            task(
                "Gather recent advancements in AI technology.\n\
                 Provide a concise report summarizing key breakthroughs and applications.",
                "A research report covering major AI advancements and their real-world applications.",
                "ai_advancements_report.pdf",
                "research",
            ),
        ),
    ])
}

fn agent(role: &str, goal: &str, backstory: &str, tools: Vec<ToolKind>, llm: &str) -> AgentSettings {
    AgentSettings {
        role: role.to_string(),
        goal: goal.to_string(),
        backstory: backstory.to_string(),
        tools,
        llm: llm.to_string(),
        verbose: true,
        max_iterations: super::types::default_max_iterations(),
        extra: BTreeMap::new(),
    }
}

fn task(description: &str, expected_output: &str, output_file: &str, agent: &str) -> TaskSettings {
    TaskSettings {
        description: description.to_string(),
        expected_output: expected_output.to_string(),
        output_file: Some(output_file.to_string()),
        agent: agent.to_string(),
        extra: BTreeMap::new(),
    }
}
