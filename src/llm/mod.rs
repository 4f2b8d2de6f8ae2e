//! Language model access.
//!
//! Agents and the `code_search` tool talk to models through the [`Llm`]
//! trait. The only backend is a local Ollama server ([`OllamaLlm`]); model
//! identifiers may carry an `ollama/` provider prefix.

mod message;
mod ollama;

pub use message::{CallOptions, Message};
pub use ollama::{OllamaLlm, strip_provider};

use crate::config::CrewConfig;
use crate::error::{CrewError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A chat-completion backend.
pub trait Llm: Send + Sync {
    /// Model identifier as configured.
    fn model(&self) -> &str;

    /// Send a conversation and return the assistant's reply text.
    fn call(&self, messages: &[Message], options: &CallOptions) -> Result<String>;
}

/// Shared handle to a model backend.
pub type SharedLlm = Arc<dyn Llm>;

/// Build one client per configured LLM, keyed by name.
pub fn build_llms(config: &CrewConfig) -> Result<BTreeMap<String, SharedLlm>> {
    config
        .llms
        .iter()
        .map(|(name, settings)| {
            let llm = OllamaLlm::new(settings).map_err(|e| {
                CrewError::ConfigError(format!("failed to set up llm '{}': {}", name, e))
            })?;
            Ok((name.clone(), Arc::new(llm) as SharedLlm))
        })
        .collect()
}
