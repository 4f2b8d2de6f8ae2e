//! Implementation of the `schoolcrew doctor` command.
//!
//! Diagnoses whether a run can work and optionally installs missing models.
//!
//! # Read-only mode (default)
//!
//! Reports:
//! - A crew config that fails to load or validate
//! - No crew config (the built-in crew is used)
//! - No `.env` file in the workspace
//! - `SERPER_API_KEY` unset while an agent uses web search
//! - Model servers that cannot be reached
//! - Configured models that are not installed
//!
//! # Install mode (`--install`)
//!
//! Pulls missing models with the configured install command, the same way
//! `run` does before a task.

mod checks;
mod display;


use crate::cli::DoctorArgs;
use crate::config::CrewConfig;
use crate::context::{WorkspaceContext, load_workspace_from};
use crate::error::{CrewError, Result};
use crate::install::ensure_models;
use std::path::Path;

pub use checks::*;
pub use display::*;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Warning: a run works, but something is degraded.
    Warning,
    /// Error: a run will fail until this is fixed.
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A detected issue with a recommended fix.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: IssueSeverity,
    /// Category of the issue.
    pub category: String,
    pub description: String,
    /// Path or identifier involved.
    pub path: Option<String>,
    /// Recommended remediation command or action.
    pub remediation: Option<String>,
    /// Whether `--install` can fix this issue.
    pub installable: bool,
}

impl Issue {
    pub fn new(severity: IssueSeverity, category: &str, description: &str) -> Self {
        Self {
            severity,
            category: category.to_string(),
            description: description.to_string(),
            path: None,
            remediation: None,
            installable: false,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }

    pub fn installable(mut self) -> Self {
        self.installable = true;
        self
    }
}

/// Result of running the doctor checks.
#[derive(Debug, Default)]
pub struct DoctorReport {
    pub issues: Vec<Issue>,
    /// Models installed in install mode.
    pub installed: Vec<String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }
}

/// Execute the `schoolcrew doctor` command.
pub fn cmd_doctor(args: DoctorArgs, config_override: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        CrewError::IoError(format!("failed to get current working directory: {}", e))
    })?;

    let report = diagnose(&cwd, config_override, args.install);
    print_report(&report, args.install);

    if report.has_errors() {
        let errors = report
            .issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count();
        return Err(CrewError::UserError(format!(
            "Found {} error(s). A run will fail until they are fixed.",
            errors
        )));
    }
    Ok(())
}

/// Run every check for the workspace at `root`, installing missing models
/// first when `install` is set.
pub fn diagnose(root: &Path, config_override: Option<&Path>, install: bool) -> DoctorReport {
    let mut report = DoctorReport::new();

    let (ctx, config) = match load_workspace_from(root, config_override) {
        Ok(loaded) => loaded,
        Err(e) => {
            let config_path = WorkspaceContext::locate_config(root, config_override);
            report.issues.push(
                Issue::new(IssueSeverity::Error, "config", &e.to_string())
                    .with_path(&config_path.display().to_string())
                    .with_remediation(
                        "Fix the file, or start over with `schoolcrew init --force`",
                    ),
            );
            // Keep checking the rest against the built-in crew
            let config = CrewConfig::default();
            let ctx = WorkspaceContext::new(root.to_path_buf(), config_path, &config.crew);
            (ctx, config)
        }
    };

    check_config_present(&ctx, config_override, &mut report);
    check_env_file(&ctx, &mut report);
    check_serper_key(&config, &mut report);

    if install {
        for outcome in ensure_models(&ctx, &config) {
            if outcome.installed {
                report.installed.push(outcome.model);
            }
        }
    }
    check_models(&config, &mut report);

    report
}
