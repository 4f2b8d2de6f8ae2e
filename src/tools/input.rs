//! Parsing of the `Action Input:` payload.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>()\[\]]+"#).expect("Invalid URL regex"));

/// Arguments passed to a tool.
///
/// Models either send a JSON object (`{"search_query": "..."}`) or bare text.
/// Fields of a JSON object are looked up by name; bare text is the sole
/// argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInput {
    raw: String,
    fields: Option<Map<String, Value>>,
}

impl ToolInput {
    pub fn parse(raw: &str) -> Self {
        let raw = strip_code_fence(raw.trim()).trim().to_string();
        let fields = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        };
        Self { raw, fields }
    }

    /// The input text, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_object(&self) -> bool {
        self.fields.is_some()
    }

    /// A named field as text. Non-string JSON values are rendered as JSON.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = self.fields.as_ref()?.get(key)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Null => return None,
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// The first non-empty field among `keys`.
    ///
    /// Bare text answers for any key. An object with none of the keys but a
    /// single string field answers with that field.
    pub fn argument(&self, keys: &[&str]) -> Option<String> {
        match &self.fields {
            None => (!self.raw.is_empty()).then(|| self.raw.clone()),
            Some(fields) => keys.iter().find_map(|key| self.get(key)).or_else(|| {
                let mut strings = fields.values().filter_map(Value::as_str);
                match (strings.next(), strings.next()) {
                    (Some(only), None) if !only.trim().is_empty() => Some(only.trim().to_string()),
                    _ => None,
                }
            }),
        }
    }

    /// First `http(s)://` URL found in the raw text.
    pub fn find_url(&self) -> Option<String> {
        URL_REGEX
            .find(&self.raw)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';']).to_string())
    }
}

/// Models like to wrap JSON in Markdown fences.
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    match inner.split_once('\n') {
        Some((lang, body)) if !lang.trim().contains(' ') => body,
        _ => inner,
    }
}
