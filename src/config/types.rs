//! Configuration section types and defaults for schoolcrew.
//!
//! Each section of `crew.yaml` maps to one struct here. Missing fields fall
//! back to the default value functions at the bottom of this module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tools an agent may be equipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Forwards a query to a language model and returns its answer.
    CodeSearch,
    /// Google results through the Serper API.
    SerperSearch,
    /// Lexical search over the text of a single web page.
    WebsiteSearch,
}

impl ToolKind {
    /// All tool kinds, in display order.
    pub const ALL: [ToolKind; 3] = [
        ToolKind::CodeSearch,
        ToolKind::SerperSearch,
        ToolKind::WebsiteSearch,
    ];

    /// The name an agent uses to call this tool.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::CodeSearch => "code_search",
            ToolKind::SerperSearch => "serper_search",
            ToolKind::WebsiteSearch => "website_search",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Connection settings for one language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model identifier, optionally with a provider prefix (`ollama/mistral:latest`).
    pub model: String,

    /// Base URL of the model server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature (server default when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_llm_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for transient failures (connection errors, 429/5xx).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl LlmSettings {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            base_url: default_base_url(),
            temperature: None,
            timeout_seconds: default_llm_timeout_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

/// Persona and capabilities of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    pub role: String,
    pub goal: String,
    pub backstory: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolKind>,

    /// Name of an entry under `llms`.
    pub llm: String,

    /// Print each reasoning step to stdout.
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Upper bound on model round-trips before a final answer is forced.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A unit of work bound to exactly one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSettings {
    /// Task description; `{name}` placeholders are filled from kickoff inputs.
    pub description: String,

    /// What a complete answer looks like.
    pub expected_output: String,

    /// File the final answer is written to, relative to `crew.output_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,

    /// Name of an entry under `agents`.
    pub agent: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Per-tool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub code_search: CodeSearchSettings,
    pub serper: SerperSettings,
    pub website_search: WebsiteSearchSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSearchSettings {
    /// Name of the LLM the tool forwards queries to.
    pub llm: String,
}

impl Default for CodeSearchSettings {
    fn default() -> Self {
        Self {
            llm: "general".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerperSettings {
    pub base_url: String,
    /// Number of organic results requested.
    pub results: u32,
    pub timeout_seconds: u64,
}

impl Default for SerperSettings {
    fn default() -> Self {
        Self {
            base_url: "https://google.serper.dev".to_string(),
            results: 10,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteSearchSettings {
    /// Number of ranked chunks returned to the agent.
    pub max_chunks: usize,
    /// Target chunk size in characters.
    pub chunk_chars: usize,
    pub timeout_seconds: u64,
}

impl Default for WebsiteSearchSettings {
    fn default() -> Self {
        Self {
            max_chunks: 5,
            chunk_chars: 800,
            timeout_seconds: 30,
        }
    }
}

/// The crew grouping and where its artifacts go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewSettings {
    /// Agents that belong to the crew.
    pub agents: Vec<String>,
    /// Tasks in the order a full kickoff runs them.
    pub tasks: Vec<String>,
    /// Print kickoff progress to stdout.
    pub verbose: bool,
    /// Directory task output files are written to.
    pub output_dir: String,
    /// Directory for the event log.
    pub state_dir: String,
}

impl Default for CrewSettings {
    fn default() -> Self {
        Self {
            agents: vec![
                "coding".to_string(),
                "teacher".to_string(),
                "research".to_string(),
            ],
            tasks: vec![
                "coding".to_string(),
                "teacher".to_string(),
                "research".to_string(),
            ],
            verbose: true,
            output_dir: ".".to_string(),
            state_dir: ".schoolcrew".to_string(),
        }
    }
}

/// Best-effort installation of missing models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    /// Check for missing models before an interactive run.
    pub auto_pull: bool,
    /// Install command template; `{model}` is the bare model name.
    pub command: String,
    pub timeout_seconds: u64,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            auto_pull: true,
            command: "ollama pull {model}".to_string(),
            timeout_seconds: 1800,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}
pub(crate) fn default_llm_timeout_seconds() -> u64 {
    300
}
pub(crate) fn default_max_retries() -> u32 {
    3
}
pub(crate) fn default_max_iterations() -> u32 {
    15
}
pub(crate) fn default_true() -> bool {
    true
}
