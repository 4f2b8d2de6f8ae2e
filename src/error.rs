//! Error types for the schoolcrew CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for schoolcrew operations.
///
/// Each variant maps to a specific process exit code.
#[derive(Error, Debug)]
pub enum CrewError {
    /// User provided invalid arguments or input.
    #[error("{0}")]
    UserError(String),

    /// The task selection was not one of the known choices.
    #[error("❌ Invalid choice. Please enter 'coding', 'theoretical', or 'research'.")]
    InvalidChoice(String),

    /// The crew configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The language model backend failed.
    #[error("LLM call failed: {0}")]
    LlmError(String),

    /// A tool invocation failed.
    #[error("Tool '{tool}' failed: {message}")]
    ToolError { tool: String, message: String },

    /// Filesystem or terminal I/O failed.
    #[error("I/O failure: {0}")]
    IoError(String),
}

impl CrewError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrewError::UserError(_) | CrewError::InvalidChoice(_) => exit_codes::USER_ERROR,
            CrewError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            CrewError::LlmError(_) | CrewError::ToolError { .. } => exit_codes::LLM_FAILURE,
            CrewError::IoError(_) => exit_codes::IO_FAILURE,
        }
    }

    /// Shorthand for building a tool error.
    pub fn tool(tool: &str, message: impl Into<String>) -> Self {
        CrewError::ToolError {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for schoolcrew operations.
pub type Result<T> = std::result::Result<T, CrewError>;
