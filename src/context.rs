//! Workspace context resolution for schoolcrew.
//!
//! Resolves where the crew config lives and where a run writes its
//! artifacts (task output files and the event log). Relative directories in
//! the config are taken relative to the workspace root, which is the
//! directory schoolcrew was invoked from.

use crate::config::CrewConfig;
use crate::config::types::CrewSettings;
use crate::env;
use crate::error::{CrewError, Result};
use std::path::{Path, PathBuf};

/// Default crew config file name, relative to the workspace root.
pub const DEFAULT_CONFIG_FILE: &str = "crew.yaml";

/// Event log file name within the state directory.
pub const EVENTS_FILE: &str = "events.ndjson";

/// Resolved paths for a schoolcrew run. All paths are absolute.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// Directory schoolcrew was invoked from.
    pub root: PathBuf,

    /// Path of the crew config (may not exist; the built-in crew is used then).
    pub config_path: PathBuf,

    /// Directory task output files are written to.
    pub output_dir: PathBuf,

    /// Directory holding the event log.
    pub state_dir: PathBuf,
}

impl WorkspaceContext {
    /// Build a context for `root` using the directories from `crew`.
    pub fn new(root: PathBuf, config_path: PathBuf, crew: &CrewSettings) -> Self {
        let output_dir = join_relative(&root, &crew.output_dir);
        let state_dir = join_relative(&root, &crew.state_dir);
        Self {
            root,
            config_path,
            output_dir,
            state_dir,
        }
    }

    /// Locate the config file for a workspace.
    ///
    /// Order: explicit override, then `SCHOOLCREW_CONFIG`, then
    /// `{root}/crew.yaml`.
    pub fn locate_config(root: &Path, config_override: Option<&Path>) -> PathBuf {
        if let Some(path) = config_override {
            return join_relative(root, &path.to_string_lossy());
        }
        if let Some(path) = env::var(env::CONFIG_PATH) {
            return join_relative(root, &path);
        }
        root.join(DEFAULT_CONFIG_FILE)
    }

    /// Path of the event log.
    pub fn events_file(&self) -> PathBuf {
        self.state_dir.join(EVENTS_FILE)
    }

    /// Path a task output file is written to.
    pub fn output_path(&self, output_file: &str) -> PathBuf {
        join_relative(&self.output_dir, output_file)
    }
}

/// Resolve the workspace from the current directory and load its config.
///
/// An explicit `config_override` must exist; otherwise a missing config
/// falls back to the built-in crew. `OLLAMA_BASE_URL` is applied on top of
/// whatever was loaded.
pub fn load_workspace(config_override: Option<&Path>) -> Result<(WorkspaceContext, CrewConfig)> {
    let cwd = std::env::current_dir().map_err(|e| {
        CrewError::IoError(format!("failed to get current working directory: {}", e))
    })?;
    load_workspace_from(&cwd, config_override)
}

/// Same as [`load_workspace`] with an explicit root directory.
pub fn load_workspace_from(
    root: &Path,
    config_override: Option<&Path>,
) -> Result<(WorkspaceContext, CrewConfig)> {
    let config_path = WorkspaceContext::locate_config(root, config_override);

    let mut config = if config_override.is_some() {
        CrewConfig::load(&config_path)?
    } else {
        CrewConfig::load_or_default(&config_path)?
    };

    if let Some(base_url) = env::var(env::OLLAMA_BASE_URL) {
        log::info!("Using LLM base URL {} from {}", base_url, env::OLLAMA_BASE_URL);
        config.override_base_url(&base_url);
    }

    let ctx = WorkspaceContext::new(root.to_path_buf(), config_path, &config.crew);
    Ok((ctx, config))
}

fn join_relative(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
