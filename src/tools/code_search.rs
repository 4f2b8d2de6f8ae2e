//! `code_search`: hands the query to a general-purpose model.

use super::{Tool, ToolInput};
use crate::error::{CrewError, Result};
use crate::llm::{CallOptions, Message, SharedLlm};

const NAME: &str = "code_search";

pub struct CodeSearchTool {
    llm: SharedLlm,
}

impl CodeSearchTool {
    pub fn new(llm: SharedLlm) -> Self {
        Self { llm }
    }
}

impl Tool for CodeSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Code search tool to retrieve relevant code snippets based on user input. \
         Input: the question or code request as plain text."
    }

    fn run(&self, input: &ToolInput) -> Result<String> {
        let query = input
            .argument(&["input", "query", "search_query"])
            .ok_or_else(|| CrewError::tool(NAME, "no query given"))?;

        self.llm
            .call(&[Message::user(query)], &CallOptions::default())
            .map_err(|e| CrewError::tool(NAME, e.to_string()))
    }
}
