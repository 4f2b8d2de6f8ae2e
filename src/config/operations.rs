//! Config loading, validation, and utility operations.

use super::model::CrewConfig;
use super::types::ToolKind;
use crate::error::{CrewError, Result};
use std::path::Path;

/// Upper bound for `llms.*.max_retries`.
const MAX_LLM_RETRIES: u32 = 10;

impl CrewConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are preserved for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(CrewConfig)` - Successfully loaded and validated config
    /// * `Err(CrewError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CrewError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise use the built-in crew.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading crew config from {}", path.display());
            Self::load(path)
        } else {
            log::info!(
                "No crew config at {}, using the built-in crew",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: CrewConfig = if yaml.trim().is_empty() {
            CrewConfig::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| CrewError::ConfigError(format!("failed to parse crew YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CrewError::ConfigError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Point every LLM at `base_url` (the `OLLAMA_BASE_URL` override).
    pub fn override_base_url(&mut self, base_url: &str) {
        for llm in self.llms.values_mut() {
            llm.base_url = base_url.trim_end_matches('/').to_string();
        }
    }

    /// Validate cross references and numeric limits.
    ///
    /// Validation rules:
    /// - Every LLM has a non-empty model and base URL, a positive timeout and
    ///   at most ten retries
    /// - Every agent references an existing LLM and has a positive iteration limit
    /// - Every task references exactly one existing agent
    /// - `tools.code_search.llm` references an existing LLM if any agent uses it
    /// - Crew membership lists reference existing agents and tasks
    pub fn validate(&self) -> Result<()> {
        for (name, llm) in &self.llms {
            if llm.model.trim().is_empty() {
                return Err(invalid(format!("llm '{}' has an empty model", name)));
            }
            if llm.base_url.trim().is_empty() {
                return Err(invalid(format!("llm '{}' has an empty base_url", name)));
            }
            if llm.timeout_seconds == 0 {
                return Err(invalid(format!(
                    "llm '{}' has timeout_seconds of 0",
                    name
                )));
            }
            if llm.max_retries > MAX_LLM_RETRIES {
                return Err(invalid(format!(
                    "llm '{}' has max_retries of {} (at most {} allowed)",
                    name, llm.max_retries, MAX_LLM_RETRIES
                )));
            }
        }

        for (id, agent) in &self.agents {
            if id.is_empty() {
                return Err(invalid("agent identifier cannot be empty".to_string()));
            }
            if !self.llms.contains_key(&agent.llm) {
                return Err(invalid(format!(
                    "agent '{}' references unknown llm '{}' (available: {})",
                    id,
                    agent.llm,
                    join_keys(self.llms.keys())
                )));
            }
            if agent.max_iterations == 0 {
                return Err(invalid(format!(
                    "agent '{}' has max_iterations of 0",
                    id
                )));
            }
            if agent.role.trim().is_empty() {
                return Err(invalid(format!("agent '{}' has an empty role", id)));
            }
        }

        for (id, task) in &self.tasks {
            if task.agent.trim().is_empty() {
                return Err(invalid(format!("task '{}' is not bound to an agent", id)));
            }
            if !self.agents.contains_key(&task.agent) {
                return Err(invalid(format!(
                    "task '{}' references unknown agent '{}' (available: {})",
                    id,
                    task.agent,
                    join_keys(self.agents.keys())
                )));
            }
            if task.description.trim().is_empty() {
                return Err(invalid(format!("task '{}' has an empty description", id)));
            }
            if let Some(ref output_file) = task.output_file
                && output_file.trim().is_empty()
            {
                return Err(invalid(format!("task '{}' has an empty output_file", id)));
            }
        }

        let code_search_used = self
            .agents
            .values()
            .any(|a| a.tools.contains(&ToolKind::CodeSearch));
        if code_search_used && !self.llms.contains_key(&self.tools.code_search.llm) {
            return Err(invalid(format!(
                "tools.code_search references unknown llm '{}'",
                self.tools.code_search.llm
            )));
        }

        for id in &self.crew.agents {
            if !self.agents.contains_key(id) {
                return Err(invalid(format!("crew.agents lists unknown agent '{}'", id)));
            }
        }
        for id in &self.crew.tasks {
            if !self.tasks.contains_key(id) {
                return Err(invalid(format!("crew.tasks lists unknown task '{}'", id)));
            }
        }

        if self.install.timeout_seconds == 0 {
            return Err(invalid(
                "install.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Tasks in kickoff order: `crew.tasks` if set, otherwise every task by id.
    pub fn ordered_task_ids(&self) -> Vec<&str> {
        if self.crew.tasks.is_empty() {
            self.tasks.keys().map(String::as_str).collect()
        } else {
            self.crew.tasks.iter().map(String::as_str).collect()
        }
    }
}

fn invalid(message: String) -> CrewError {
    CrewError::ConfigError(format!("crew.yaml validation failed: {}", message))
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}
