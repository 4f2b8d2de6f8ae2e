//! Blocking client for the Ollama chat API.

use super::{CallOptions, Llm, Message};
use crate::config::LlmSettings;
use crate::error::{CrewError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Provider prefixes accepted in front of an Ollama model name.
const PROVIDER_PREFIXES: [&str; 2] = ["ollama_chat/", "ollama/"];

/// First retry delay; doubles on every further attempt.
const BASE_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Longest wait between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Ollama chat client.
#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: Client,
    base_url: String,
    /// Model as configured (may carry a provider prefix).
    model: String,
    temperature: Option<f32>,
    max_retries: u32,
    retry_delay: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "ChatOptions::is_empty")]
    options: ChatOptions<'a>,
}

#[derive(Debug, Serialize)]
struct ChatOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [String],
}

fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

impl ChatOptions<'_> {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.stop.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Outcome of one HTTP attempt.
enum Attempt {
    Done(String),
    Retry(String),
}

/// Strip a provider prefix (`ollama/`) from a model identifier.
pub fn strip_provider(model: &str) -> &str {
    PROVIDER_PREFIXES
        .iter()
        .find_map(|prefix| model.strip_prefix(prefix))
        .unwrap_or(model)
}

impl OllamaLlm {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CrewError::LlmError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_retries: settings.max_retries,
            retry_delay: BASE_RETRY_DELAY,
        })
    }

    /// Override the first retry delay.
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Model name as the server knows it (provider prefix removed).
    pub fn server_model(&self) -> &str {
        strip_provider(&self.model)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the models installed on the server.
    pub fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| CrewError::LlmError(format!("Ollama at {} unreachable: {}", self.base_url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CrewError::LlmError(format!("failed to read model list: {}", e)))?;
        if !status.is_success() {
            return Err(CrewError::LlmError(format!(
                "listing models failed with HTTP {}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let tags: TagsResponse = serde_json::from_str(&body)
            .map_err(|e| CrewError::LlmError(format!("unexpected model list response: {}", e)))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether this client's model is installed on the server.
    pub fn is_installed(&self) -> Result<bool> {
        let installed = self.list_models()?;
        Ok(model_matches(self.server_model(), &installed))
    }

    fn attempt(&self, url: &str, request: &ChatRequest<'_>) -> Result<Attempt> {
        let response = match self.client.post(url).json(request).send() {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                return Ok(Attempt::Retry(format!("Ollama request failed: {}", e)));
            }
            Err(e) => return Err(CrewError::LlmError(format!("Ollama request failed: {}", e))),
        };

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CrewError::LlmError(format!("failed to read Ollama response: {}", e)))?;

        if status.is_success() {
            let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
                CrewError::LlmError(format!("unexpected Ollama response: {}", e))
            })?;
            if let Some(reason) = parsed.done_reason.as_deref()
                && reason != "stop"
            {
                log::debug!("[OLLAMA] generation ended with reason '{}'", reason);
            }
            return Ok(Attempt::Done(parsed.message.content));
        }

        let message = format!(
            "Ollama returned HTTP {}: {}",
            status.as_u16(),
            error_message(&body)
        );
        if matches!(status.as_u16(), 429 | 502 | 503 | 504) {
            Ok(Attempt::Retry(message))
        } else {
            Err(CrewError::LlmError(message))
        }
    }
}

impl Llm for OllamaLlm {
    fn model(&self) -> &str {
        &self.model
    }

    fn call(&self, messages: &[Message], options: &CallOptions) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: self.server_model(),
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                stop: &options.stop,
            },
        };

        log::debug!(
            "Sending {} message(s) to Ollama model {}",
            messages.len(),
            self.server_model()
        );

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_delay, attempt);
                log::warn!(
                    "[OLLAMA] Retry attempt {}/{} after {}ms delay",
                    attempt,
                    self.max_retries,
                    delay.as_millis()
                );
                thread::sleep(delay);
            }

            match self.attempt(&url, &request)? {
                Attempt::Done(content) => return Ok(content),
                Attempt::Retry(message) => {
                    log::warn!("[OLLAMA] {} (attempt {})", message, attempt + 1);
                    last_error = message;
                }
            }
        }

        Err(CrewError::LlmError(format!(
            "{} (gave up after {} attempt(s))",
            last_error,
            self.max_retries + 1
        )))
    }
}

/// Pull the `error` field out of an Ollama error body, or fall back to the raw text.
/// Delay before retry number `attempt` (1-based): `base` doubled per earlier
/// retry, capped at [`MAX_RETRY_DELAY`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Ollama treats a model without a tag as `:latest`.
fn model_matches(wanted: &str, installed: &[String]) -> bool {
    let wanted = if wanted.contains(':') {
        wanted.to_string()
    } else {
        format!("{}:latest", wanted)
    };
    installed.iter().any(|name| *name == wanted)
}
