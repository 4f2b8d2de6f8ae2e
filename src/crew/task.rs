//! Tasks: units of work bound to one agent.

use crate::agent::prompt::{TemplateError, escape_braces, placeholders, render_template};
use crate::config::TaskSettings;
use crate::error::{CrewError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    /// Description template; `{name}` placeholders come from kickoff inputs.
    pub description: String,
    pub expected_output: String,
    /// File the final answer is written to, relative to the output directory.
    pub output_file: Option<String>,
    /// Id of the agent that performs the task.
    pub agent: String,
}

impl Task {
    pub fn new(id: &str, settings: &TaskSettings) -> Self {
        Self {
            id: id.to_string(),
            description: settings.description.clone(),
            expected_output: settings.expected_output.clone(),
            output_file: settings.output_file.clone(),
            agent: settings.agent.clone(),
        }
    }

    /// Prefix the description with `Question: <question>` on its own line.
    ///
    /// The question is taken literally; braces in it are not placeholders.
    pub fn with_question_prefix(mut self, question: &str) -> Self {
        self.description = format!("Question: {}\n{}", escape_braces(question), self.description);
        self
    }

    /// Input names the description and expected output refer to.
    pub fn required_inputs(&self) -> Result<Vec<String>> {
        let mut names = placeholders(&self.description).map_err(|e| self.template_error(e))?;
        for name in placeholders(&self.expected_output).map_err(|e| self.template_error(e))? {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Description and expected output with `inputs` filled in.
    pub fn render(&self, inputs: &BTreeMap<String, String>) -> Result<(String, String)> {
        let missing: Vec<String> = self
            .required_inputs()?
            .into_iter()
            .filter(|name| !inputs.contains_key(name))
            .collect();
        if !missing.is_empty() {
            let flags = missing
                .iter()
                .map(|name| format!("--input {}=...", name))
                .collect::<Vec<_>>()
                .join(" ");
            return Err(CrewError::UserError(format!(
                "task '{}' needs input(s): {}\nFix: pass {}",
                self.id,
                missing.join(", "),
                flags
            )));
        }

        let description =
            render_template(&self.description, inputs).map_err(|e| self.template_error(e))?;
        let expected_output =
            render_template(&self.expected_output, inputs).map_err(|e| self.template_error(e))?;
        Ok((description, expected_output))
    }

    fn template_error(&self, e: TemplateError) -> CrewError {
        CrewError::ConfigError(format!("task '{}': {}", self.id, e))
    }
}
