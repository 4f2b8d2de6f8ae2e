//! Health check functions for the doctor command.

use crate::config::{CrewConfig, ToolKind};
use crate::context::WorkspaceContext;
use crate::env;
use crate::llm::OllamaLlm;
use std::collections::BTreeSet;
use std::path::Path;

use super::{DoctorReport, Issue, IssueSeverity};

/// Check whether a crew config exists. An explicit `--config` that is
/// missing already failed to load, so only the default location is checked.
pub fn check_config_present(
    ctx: &WorkspaceContext,
    config_override: Option<&Path>,
    report: &mut DoctorReport,
) {
    if config_override.is_some() || ctx.config_path.exists() {
        return;
    }

    report.issues.push(
        Issue::new(
            IssueSeverity::Warning,
            "config",
            "No crew config found; the built-in crew is used",
        )
        .with_path(&ctx.config_path.display().to_string())
        .with_remediation("schoolcrew init"),
    );
}

/// Check for a `.env` file in the workspace root.
pub fn check_env_file(ctx: &WorkspaceContext, report: &mut DoctorReport) {
    let env_path = ctx.root.join(".env");
    if env_path.exists() {
        return;
    }

    report.issues.push(
        Issue::new(
            IssueSeverity::Warning,
            "env_file",
            "No .env file in the workspace; only the process environment is used",
        )
        .with_path(&env_path.display().to_string())
        .with_remediation("Create .env with a line such as SERPER_API_KEY=<your key>"),
    );
}

/// Check that the Serper API key is set when an agent searches the web.
pub fn check_serper_key(config: &CrewConfig, report: &mut DoctorReport) {
    let users: Vec<&str> = config
        .agents
        .iter()
        .filter(|(_, agent)| agent.tools.contains(&ToolKind::SerperSearch))
        .map(|(id, _)| id.as_str())
        .collect();
    if users.is_empty() || env::var(env::SERPER_API_KEY).is_some() {
        return;
    }

    report.issues.push(
        Issue::new(
            IssueSeverity::Warning,
            "api_key",
            &format!(
                "{} is not set; web search fails for agent(s): {}",
                env::SERPER_API_KEY,
                users.join(", ")
            ),
        )
        .with_remediation(&format!(
            "Add {}=<your key> to .env (keys at https://serper.dev)",
            env::SERPER_API_KEY
        )),
    );
}

/// Check that every model server answers and every configured model is
/// installed on it. Each unreachable server is reported once.
pub fn check_models(config: &CrewConfig, report: &mut DoctorReport) {
    let mut unreachable = BTreeSet::new();
    let mut seen = BTreeSet::new();

    for (name, settings) in &config.llms {
        let client = match OllamaLlm::new(settings) {
            Ok(client) => client,
            Err(e) => {
                report.issues.push(Issue::new(
                    IssueSeverity::Error,
                    "llm",
                    &format!("llm '{}': {}", name, e),
                ));
                continue;
            }
        };
        let base_url = client.base_url().to_string();
        let model = client.server_model().to_string();
        if unreachable.contains(&base_url) || !seen.insert((base_url.clone(), model.clone())) {
            continue;
        }

        match client.is_installed() {
            Ok(true) => log::debug!("Model '{}' is installed at {}", model, base_url),
            Ok(false) => report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "missing_model",
                    &format!("Model '{}' (llm '{}') is not installed", model, name),
                )
                .with_path(&model)
                .with_remediation(&format!(
                    "schoolcrew doctor --install\nor: ollama pull {}",
                    model
                ))
                .installable(),
            ),
            Err(e) => {
                report.issues.push(
                    Issue::new(IssueSeverity::Error, "model_server", &e.to_string())
                        .with_path(&base_url)
                        .with_remediation(&format!(
                            "Start the server with `ollama serve`, or point {} at a running one",
                            env::OLLAMA_BASE_URL
                        )),
                );
                unreachable.insert(base_url);
            }
        }
    }
}
