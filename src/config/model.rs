//! CrewConfig struct definition and default implementation.

use super::defaults;
use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the crew.
///
/// This struct represents the contents of `crew.yaml`. Every top-level
/// section is optional; a missing section keeps the built-in crew's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    /// Language models keyed by name.
    pub llms: BTreeMap<String, LlmSettings>,

    /// Agent personas keyed by identifier.
    pub agents: BTreeMap<String, AgentSettings>,

    /// Task descriptors keyed by identifier.
    pub tasks: BTreeMap<String, TaskSettings>,

    pub tools: ToolSettings,

    pub crew: CrewSettings,

    pub install: InstallSettings,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            llms: defaults::llms(),
            agents: defaults::agents(),
            tasks: defaults::tasks(),
            tools: ToolSettings::default(),
            crew: CrewSettings::default(),
            install: InstallSettings::default(),
            extra: BTreeMap::new(),
        }
    }
}
