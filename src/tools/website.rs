//! `website_search`: lexical search over the text of one web page.

use super::{Tool, ToolInput};
use crate::config::types::WebsiteSearchSettings;
use crate::error::{CrewError, Result};
use reqwest::blocking::Client;
use std::cmp::Reverse;
use std::time::Duration;

const NAME: &str = "website_search";

pub struct WebsiteSearchTool {
    client: Client,
    max_chunks: usize,
    chunk_chars: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Chunk {
    index: usize,
    text: String,
    score: usize,
}

impl WebsiteSearchTool {
    pub fn new(settings: &WebsiteSearchSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("schoolcrew/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrewError::tool(NAME, format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_chunks: settings.max_chunks.max(1),
            chunk_chars: settings.chunk_chars.max(100),
        })
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CrewError::tool(NAME, format!("failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("html"));
        let body = response
            .text()
            .map_err(|e| CrewError::tool(NAME, format!("failed to read {}: {}", url, e)))?;

        if !status.is_success() {
            return Err(CrewError::tool(
                NAME,
                format!("{} returned HTTP {}", url, status.as_u16()),
            ));
        }

        if is_html {
            htmd::convert(&body)
                .map_err(|e| CrewError::tool(NAME, format!("failed to convert {}: {}", url, e)))
        } else {
            Ok(body)
        }
    }
}

impl Tool for WebsiteSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search the content of a specific website. \
         Input: {\"search_query\": \"<what to look for>\", \"website\": \"<url>\"}"
    }

    fn run(&self, input: &ToolInput) -> Result<String> {
        let website = input
            .get("website")
            .or_else(|| input.get("url"))
            .or_else(|| input.find_url())
            .ok_or_else(|| CrewError::tool(NAME, "no website given"))?;

        let query = if input.is_object() {
            input.get("search_query").or_else(|| input.get("query"))
        } else {
            let rest = input.raw().replace(&website, " ");
            let rest = rest.trim();
            (!rest.is_empty()).then(|| rest.to_string())
        }
        .ok_or_else(|| CrewError::tool(NAME, "no search query given"))?;

        log::debug!("Searching {} for '{}'", website, query);
        let text = self.fetch_text(&website)?;
        let chunks = split_chunks(&text, self.chunk_chars);
        if chunks.is_empty() {
            return Ok(format!("{} has no readable text.", website));
        }

        let ranked = rank_chunks(&chunks, &query, self.max_chunks);
        let (header, picked) = if ranked.is_empty() {
            (
                format!(
                    "No passages on {} matched '{}'; start of the page:",
                    website, query
                ),
                chunks
                    .iter()
                    .take(self.max_chunks)
                    .cloned()
                    .enumerate()
                    .map(|(index, text)| Chunk {
                        index,
                        text,
                        score: 0,
                    })
                    .collect(),
            )
        } else {
            (
                format!("Relevant content from {}:", website),
                ranked,
            )
        };

        let body = picked
            .iter()
            .map(|chunk| format!("[{}] {}", chunk.index + 1, chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(format!("{}\n\n{}", header, body))
    }
}

/// Split text into paragraph-aligned chunks of roughly `max_chars` characters.
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let paragraph = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");

        if !current.is_empty() && current.chars().count() + paragraph.chars().count() + 1 > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if paragraph.chars().count() > max_chars {
            let mut piece = String::new();
            for word in paragraph.split(' ') {
                if !piece.is_empty() && piece.chars().count() + word.chars().count() + 1 > max_chars {
                    chunks.push(std::mem::take(&mut piece));
                }
                if !piece.is_empty() {
                    piece.push(' ');
                }
                piece.push_str(word);
            }
            current = piece;
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 2)
        .collect()
}

/// Chunks with at least one query term, best first; ties keep page order.
fn rank_chunks(chunks: &[String], query: &str, max_chunks: usize) -> Vec<Chunk> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored = chunks
        .iter()
        .enumerate()
        .filter_map(|(index, text)| {
            let body = text.to_lowercase();
            let score = terms
                .iter()
                .map(|term| body.matches(term.as_str()).count())
                .sum::<usize>();
            (score > 0).then(|| Chunk {
                index,
                text: text.clone(),
                score,
            })
        })
        .collect::<Vec<_>>();

    scored.sort_by_key(|chunk| Reverse(chunk.score));
    scored.truncate(max_chunks);
    scored
}
