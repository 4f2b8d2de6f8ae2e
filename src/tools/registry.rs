//! Builds and hands out the tools a crew needs.

use super::{CodeSearchTool, SerperSearchTool, SharedTool, WebsiteSearchTool};
use crate::config::{CrewConfig, ToolKind};
use crate::error::{CrewError, Result};
use crate::llm::SharedLlm;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One instance per tool kind, shared by every agent that lists it.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolKind, SharedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every tool some agent in `config` is equipped with.
    pub fn from_config(
        config: &CrewConfig,
        llms: &BTreeMap<String, SharedLlm>,
        serper_api_key: Option<String>,
    ) -> Result<Self> {
        let mut registry = Self::new();

        for kind in config.agents.values().flat_map(|agent| agent.tools.iter()) {
            if registry.has(*kind) {
                continue;
            }
            let tool: SharedTool = match kind {
                ToolKind::CodeSearch => {
                    let name = &config.tools.code_search.llm;
                    let llm = llms.get(name).ok_or_else(|| {
                        CrewError::ConfigError(format!(
                            "tools.code_search references unknown llm '{}'",
                            name
                        ))
                    })?;
                    Arc::new(CodeSearchTool::new(Arc::clone(llm)))
                }
                ToolKind::SerperSearch => Arc::new(SerperSearchTool::new(
                    &config.tools.serper,
                    serper_api_key.clone(),
                )?),
                ToolKind::WebsiteSearch => {
                    Arc::new(WebsiteSearchTool::new(&config.tools.website_search)?)
                }
            };
            registry.register(*kind, tool);
        }

        if registry.has(ToolKind::SerperSearch) && serper_api_key.is_none() {
            log::warn!("SERPER_API_KEY is not set; serper_search calls will fail");
        }

        log::debug!("Built {} tool(s)", registry.tools.len());
        Ok(registry)
    }

    /// Register a tool, replacing any previous one of the same kind.
    pub fn register(&mut self, kind: ToolKind, tool: SharedTool) {
        self.tools.insert(kind, tool);
    }

    pub fn has(&self, kind: ToolKind) -> bool {
        self.tools.contains_key(&kind)
    }

    pub fn get(&self, kind: ToolKind) -> Option<SharedTool> {
        self.tools.get(&kind).map(Arc::clone)
    }

    /// Tools for an agent's tool list, in the order listed.
    pub fn tools_for(&self, kinds: &[ToolKind]) -> Result<Vec<SharedTool>> {
        kinds
            .iter()
            .map(|kind| {
                self.get(*kind).ok_or_else(|| {
                    CrewError::ConfigError(format!("tool '{}' was not built", kind))
                })
            })
            .collect()
    }
}
