//! Tools agents can call while working on a task.
//!
//! Every tool takes a [`ToolInput`] (the text after `Action Input:`) and
//! returns plain text that is fed back to the model as an observation.

mod code_search;
mod input;
mod registry;
mod serper;
mod website;

pub use code_search::CodeSearchTool;
pub use input::ToolInput;
pub use registry::ToolRegistry;
pub use serper::SerperSearchTool;
pub use website::WebsiteSearchTool;

use crate::error::Result;
use std::sync::Arc;

/// A capability an agent can invoke by name.
pub trait Tool: Send + Sync {
    /// Name the model uses in `Action:`.
    fn name(&self) -> &str;

    /// One-line description shown in the agent's prompt.
    fn description(&self) -> &str;

    fn run(&self, input: &ToolInput) -> Result<String>;
}

pub type SharedTool = Arc<dyn Tool>;
