//! Best-effort installation of missing models.
//!
//! Before an interactive run every configured model is looked up on its
//! Ollama server. Missing models are pulled with the configured install
//! command. Nothing here aborts a run: failures are printed and the run
//! carries on, surfacing any real problem at the first model call.

use crate::agent::prompt::{render_template, vars};
use crate::config::CrewConfig;
use crate::config::types::InstallSettings;
use crate::context::WorkspaceContext;
use crate::error::{CrewError, Result};
use crate::events::{Event, EventAction, record_event};
use crate::llm::OllamaLlm;
use serde_json::json;
use std::collections::BTreeSet;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Outcome of trying to install one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub model: String,
    pub installed: bool,
    /// Why the install failed.
    pub error: Option<String>,
}

/// Configured models that are not installed on their server, without
/// provider prefixes. A server that cannot be reached is logged and its
/// models are skipped; the other servers are still checked.
pub fn missing_models(config: &CrewConfig) -> Result<Vec<String>> {
    let mut unreachable = BTreeSet::new();
    let mut seen = BTreeSet::new();
    let mut missing = Vec::new();

    for settings in config.llms.values() {
        let client = OllamaLlm::new(settings)?;
        let base_url = client.base_url().to_string();
        let model = client.server_model().to_string();
        if unreachable.contains(&base_url) || !seen.insert((base_url.clone(), model.clone())) {
            continue;
        }

        match client.is_installed() {
            Ok(true) => log::debug!("Model '{}' is installed at {}", model, base_url),
            Ok(false) => {
                log::info!("Model '{}' is not installed at {}", model, base_url);
                missing.push(model);
            }
            Err(e) => {
                log::warn!("Skipping models at {}: {}", base_url, e);
                unreachable.insert(base_url);
            }
        }
    }

    Ok(missing)
}

/// Install every missing model, printing progress. Never fails.
pub fn ensure_models(ctx: &WorkspaceContext, config: &CrewConfig) -> Vec<InstallReport> {
    let missing = match missing_models(config) {
        Ok(missing) => missing,
        Err(e) => {
            log::warn!("Skipping model check: {}", e);
            return Vec::new();
        }
    };

    missing
        .into_iter()
        .map(|model| {
            println!("🔥 '{}' model missing. Installing...", model);
            let report = match install_model(&config.install, &model) {
                Ok(()) => InstallReport {
                    model,
                    installed: true,
                    error: None,
                },
                Err(e) => {
                    log::warn!("{}", e);
                    println!("Failed to install {}. Try installing it manually.", model);
                    InstallReport {
                        model,
                        installed: false,
                        error: Some(e.to_string()),
                    }
                }
            };

            record_event(
                ctx,
                Event::new(EventAction::ModelInstall).with_details(json!({
                    "model": report.model,
                    "installed": report.installed,
                    "error": report.error,
                })),
            );
            report
        })
        .collect()
}

/// Run the install command for `model` and wait for it to finish.
pub fn install_model(settings: &InstallSettings, model: &str) -> Result<()> {
    let command_str = render_template(&settings.command, &vars([("model", model)]))
        .map_err(|e| CrewError::ConfigError(format!("install.command: {}", e)))?;

    let args = shell_words::split(&command_str).map_err(|e| {
        CrewError::ConfigError(format!(
            "failed to parse install command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            command_str, e
        ))
    })?;
    let Some((program, rest)) = args.split_first() else {
        return Err(CrewError::ConfigError(
            "install.command is empty".to_string(),
        ));
    };

    log::info!("Running install command: {}", command_str);
    let mut child = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| {
            CrewError::IoError(format!(
                "failed to run '{}': {}\nFix: ensure it is installed and in PATH.",
                program, e
            ))
        })?;

    let timeout = Duration::from_secs(settings.timeout_seconds);
    match wait_with_timeout(&mut child, timeout)? {
        Some(0) => Ok(()),
        Some(code) => Err(CrewError::IoError(format!(
            "'{}' exited with status {}",
            command_str, code
        ))),
        None => Err(CrewError::IoError(format!(
            "'{}' did not finish within {}s or was killed",
            command_str, settings.timeout_seconds
        ))),
    }
}

/// Exit code of `child`, or `None` if it was killed or timed out.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<i32>> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status.code()),
            Ok(None) if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            Ok(None) => std::thread::sleep(poll_interval),
            Err(e) => {
                return Err(CrewError::IoError(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}
