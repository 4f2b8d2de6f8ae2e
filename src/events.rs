//! Event logging subsystem for schoolcrew.
//!
//! This module implements an append-only audit log of crew runs. Events are
//! stored in NDJSON format (one JSON object per line) in
//! `{state_dir}/events.ndjson`.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The action performed (kickoff, task_start, tool_use, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `task`: Optional task ID for task-specific events
//! - `details`: Freeform object with action-specific details
//!
//! Logging an event never aborts a run; use [`record_event`] from run code.

use crate::context::WorkspaceContext;
use crate::error::{CrewError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A kickoff was requested (one task or the whole crew)
    Kickoff,
    /// An agent started working on a task
    TaskStart,
    /// An agent called a tool
    ToolUse,
    /// An agent produced its final answer for a task
    TaskComplete,
    /// Every requested task finished
    KickoffComplete,
    /// A missing model was installed (or the attempt failed)
    ModelInstall,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Kickoff => write!(f, "kickoff"),
            EventAction::TaskStart => write!(f, "task_start"),
            EventAction::ToolUse => write!(f, "tool_use"),
            EventAction::TaskComplete => write!(f, "task_complete"),
            EventAction::KickoffComplete => write!(f, "kickoff_complete"),
            EventAction::ModelInstall => write!(f, "model_install"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Optional task ID for task-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            task: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the task ID for this event.
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task = Some(task_id.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CrewError::IoError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the events log.
///
/// The state directory and file are created if they don't exist. Each append
/// results in one line with a trailing newline.
pub fn append_event(ctx: &WorkspaceContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    if !ctx.state_dir.exists() {
        fs::create_dir_all(&ctx.state_dir).map_err(|e| {
            CrewError::IoError(format!(
                "failed to create state directory '{}': {}",
                ctx.state_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            CrewError::IoError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        CrewError::IoError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append an event, downgrading failures to a warning.
pub fn record_event(ctx: &WorkspaceContext, event: Event) {
    if let Err(e) = append_event(ctx, &event) {
        log::warn!("failed to log {} event: {}", event.action, e);
    }
}

/// Read every event from the log, oldest first. A missing log is empty.
pub fn read_events(ctx: &WorkspaceContext) -> Result<Vec<Event>> {
    let events_file = ctx.events_file();
    if !events_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&events_file).map_err(|e| {
        CrewError::IoError(format!(
            "failed to read events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|e| {
                CrewError::IoError(format!(
                    "malformed event in '{}': {}",
                    events_file.display(),
                    e
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_workspace;
    use serde_json::json;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Kickoff);

        assert_eq!(event.action, EventAction::Kickoff);
        assert!(!event.actor.is_empty());
        assert!(event.task.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_with_task_and_details() {
        let event = Event::new(EventAction::ToolUse)
            .with_task("research")
            .with_details(json!({"tool": "serper_search", "success": true}));

        assert_eq!(event.task, Some("research".to_string()));
        assert_eq!(event.details["tool"], "serper_search");
        assert_eq!(event.details["success"], true);
    }

    #[test]
    fn test_event_serialization_is_single_line() {
        let event = Event::new(EventAction::TaskComplete)
            .with_task("teacher")
            .with_details(json!({"answer": "line one\nline two"}));

        let json_line = event.to_ndjson_line().unwrap();
        assert!(!json_line.contains('\n'));
        assert!(json_line.contains("\"task_complete\""));
    }

    #[test]
    fn test_event_without_task_omits_field() {
        let event = Event::new(EventAction::KickoffComplete);
        let json_line = event.to_ndjson_line().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json_line).unwrap();
        assert!(parsed.get("task").is_none());
    }

    #[test]
    fn test_append_event_creates_state_dir_and_file() {
        let (_temp_dir, ctx) = test_workspace();
        assert!(!ctx.state_dir.exists());

        append_event(&ctx, &Event::new(EventAction::Kickoff)).unwrap();

        assert!(ctx.events_file().exists());
        let content = fs::read_to_string(ctx.events_file()).unwrap();
        assert!(content.ends_with('\n'));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_read_events_in_order() {
        let (_temp_dir, ctx) = test_workspace();

        append_event(&ctx, &Event::new(EventAction::Kickoff)).unwrap();
        append_event(&ctx, &Event::new(EventAction::TaskStart).with_task("coding")).unwrap();
        record_event(&ctx, Event::new(EventAction::TaskComplete).with_task("coding"));

        let events = read_events(&ctx).unwrap();
        let actions: Vec<EventAction> = events.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                EventAction::Kickoff,
                EventAction::TaskStart,
                EventAction::TaskComplete
            ]
        );
        assert_eq!(events[1].task.as_deref(), Some("coding"));
    }

    #[test]
    fn test_read_events_missing_log_is_empty() {
        let (_temp_dir, ctx) = test_workspace();
        assert!(read_events(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_record_event_swallows_failures() {
        let (temp_dir, mut ctx) = test_workspace();
        // A regular file where the state directory should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        ctx.state_dir = blocker.join("state");

        record_event(&ctx, Event::new(EventAction::Kickoff));
        assert!(append_event(&ctx, &Event::new(EventAction::Kickoff)).is_err());
    }

    #[test]
    fn test_event_action_display() {
        assert_eq!(EventAction::Kickoff.to_string(), "kickoff");
        assert_eq!(EventAction::TaskStart.to_string(), "task_start");
        assert_eq!(EventAction::ToolUse.to_string(), "tool_use");
        assert_eq!(EventAction::TaskComplete.to_string(), "task_complete");
        assert_eq!(EventAction::KickoffComplete.to_string(), "kickoff_complete");
        assert_eq!(EventAction::ModelInstall.to_string(), "model_install");
    }

    #[test]
    fn test_get_actor_string() {
        let actor = get_actor_string();
        assert!(actor.contains('@'));
    }
}
