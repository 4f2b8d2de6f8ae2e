//! Process environment: `.env` loading and the variables schoolcrew reads.
//!
//! The environment is loaded once at startup, before any config or tool is
//! constructed. Variables already set in the process win over `.env` values.

use crate::error::{CrewError, Result};
use std::path::{Path, PathBuf};

/// API key for the Serper web search tool.
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";

/// Overrides the base URL of every configured LLM.
pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";

/// Path to the crew config when `--config` is not given.
pub const CONFIG_PATH: &str = "SCHOOLCREW_CONFIG";

/// Load environment variables from a `.env` file.
///
/// With `path == None` the usual `.env` lookup applies (current directory
/// and its parents) and a missing file is not an error. An explicit path
/// must exist.
///
/// Returns the file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenv::from_path(path).map_err(|e| {
                CrewError::UserError(format!(
                    "failed to load env file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            log::info!("Loaded environment from {}", path.display());
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenv::dotenv() {
            Ok(found) => {
                log::info!("Loaded environment from {}", found.display());
                Ok(Some(found))
            }
            Err(e) => {
                log::debug!("No .env file loaded: {}", e);
                Ok(None)
            }
        },
    }
}

/// Read a variable, treating unset and blank values the same.
pub fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
