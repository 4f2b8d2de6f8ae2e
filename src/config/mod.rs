//! Configuration model for schoolcrew.
//!
//! This module defines the CrewConfig struct that represents `crew.yaml`.
//! It supports forward-compatible YAML parsing, the built-in crew as the
//! default for every section, and validation of cross references.

mod defaults;
mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use defaults::{CODE_MODEL, GENERAL_MODEL};
pub use model::CrewConfig;
pub use types::{AgentSettings, LlmSettings, TaskSettings, ToolKind};
