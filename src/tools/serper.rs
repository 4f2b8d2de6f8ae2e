//! `serper_search`: Google results through the Serper API.

use super::{Tool, ToolInput};
use crate::config::types::SerperSettings;
use crate::error::{CrewError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

const NAME: &str = "serper_search";

pub struct SerperSearchTool {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    results: u32,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeGraph {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SerperSearchTool {
    pub fn new(settings: &SerperSettings, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CrewError::tool(NAME, format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            results: settings.results,
        })
    }
}

impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search the internet with Google. Input: {\"search_query\": \"<what to look for>\"}"
    }

    fn run(&self, input: &ToolInput) -> Result<String> {
        let query = input
            .argument(&["search_query", "query", "q"])
            .ok_or_else(|| CrewError::tool(NAME, "no search query given"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CrewError::tool(NAME, "SERPER_API_KEY is not set"))?;

        log::debug!("Searching Serper for '{}'", query);
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", api_key)
            .json(&SearchRequest {
                q: &query,
                num: self.results,
            })
            .send()
            .map_err(|e| CrewError::tool(NAME, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CrewError::tool(NAME, format!("failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(CrewError::tool(
                NAME,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| CrewError::tool(NAME, format!("unexpected response: {}", e)))?;
        Ok(format_results(&query, &parsed))
    }
}

fn format_results(query: &str, response: &SearchResponse) -> String {
    let mut out = String::new();

    if let Some(answer) = &response.answer_box {
        let text = answer.answer.as_deref().or(answer.snippet.as_deref());
        if let Some(text) = text {
            let _ = writeln!(out, "Answer: {}", text);
            if let Some(title) = &answer.title {
                let _ = writeln!(out, "Source: {}", title);
            }
            out.push('\n');
        }
    }

    if let Some(graph) = &response.knowledge_graph
        && let Some(title) = &graph.title
    {
        match &graph.kind {
            Some(kind) => {
                let _ = writeln!(out, "{} ({})", title, kind);
            }
            None => {
                let _ = writeln!(out, "{}", title);
            }
        }
        if let Some(description) = &graph.description {
            let _ = writeln!(out, "{}", description);
        }
        out.push('\n');
    }

    if !response.organic.is_empty() {
        out.push_str("Search results:\n");
        for result in &response.organic {
            let _ = writeln!(out, "Title: {}", result.title);
            let _ = writeln!(out, "Link: {}", result.link);
            let _ = writeln!(out, "Snippet: {}", result.snippet);
            out.push_str("---\n");
        }
    }

    if out.is_empty() {
        return format!("No results found for '{}'.", query);
    }
    out.trim_end().to_string()
}
