//! Interactive task selection.
//!
//! The user picks one of three task kinds and, depending on the kind,
//! supplies a coding problem or a question for the teacher. The result is a
//! [`Dispatch`]: the task to kick off and the inputs to kick it off with.

use crate::crew::{Crew, Task};
use crate::error::{CrewError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

pub const SELECT_PROMPT: &str = "🔹 Select a task: (coding/theoretical/research) ";
pub const PROBLEM_PROMPT: &str = "🔹 Enter your coding problem: ";
pub const QUESTION_PROMPT: &str = "🔹 Enter your question for the teacher: ";

/// Kickoff input name that carries the coding problem.
pub const PROBLEM_INPUT: &str = "problem";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskChoice {
    Coding,
    Theoretical,
    Research,
}

impl TaskChoice {
    /// Id of the crew task this choice runs.
    pub fn task_id(&self) -> &'static str {
        match self {
            TaskChoice::Coding => "coding",
            TaskChoice::Theoretical => "teacher",
            TaskChoice::Research => "research",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskChoice::Coding => "coding",
            TaskChoice::Theoretical => "theoretical",
            TaskChoice::Research => "research",
        }
    }
}

impl FromStr for TaskChoice {
    type Err = CrewError;

    /// Surrounding whitespace and case are ignored.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coding" => Ok(TaskChoice::Coding),
            "theoretical" => Ok(TaskChoice::Theoretical),
            "research" => Ok(TaskChoice::Research),
            _ => Err(CrewError::InvalidChoice(s.trim().to_string())),
        }
    }
}

impl fmt::Display for TaskChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of answers to interactive prompts.
pub trait Prompter {
    /// Show `prompt` and return the answer line, without its line ending.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on stdout and reads answers from stdin.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)
            .and_then(|_| stdout.flush())
            .map_err(|e| CrewError::IoError(format!("failed to write prompt: {}", e)))?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CrewError::IoError(format!("failed to read input: {}", e)))?;
        if read == 0 {
            return Err(CrewError::IoError(
                "input ended before an answer was given".to_string(),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// What to kick off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub choice: TaskChoice,
    /// The task to run, already carrying any question prefix.
    pub task: Task,
    pub inputs: BTreeMap<String, String>,
}

/// Ask for the task kind unless `preset` already names one.
pub fn select_task(prompter: &mut dyn Prompter, preset: Option<&str>) -> Result<TaskChoice> {
    let answer = match preset {
        Some(answer) => answer.to_string(),
        None => prompter.ask(SELECT_PROMPT)?,
    };
    answer.parse()
}

/// Turn a choice into a dispatch, asking for the problem or question unless
/// `preset_input` supplies it.
pub fn plan_dispatch(
    choice: TaskChoice,
    prompter: &mut dyn Prompter,
    crew: &Crew,
    preset_input: Option<&str>,
) -> Result<Dispatch> {
    let task = crew.task(choice.task_id()).cloned().ok_or_else(|| {
        CrewError::ConfigError(format!(
            "the crew has no '{}' task for the '{}' choice",
            choice.task_id(),
            choice
        ))
    })?;

    let mut ask = |prompt: &str| -> Result<String> {
        let answer = match preset_input {
            Some(answer) => answer.to_string(),
            None => prompter.ask(prompt)?,
        };
        Ok(answer.trim().to_string())
    };

    let dispatch = match choice {
        TaskChoice::Coding => {
            let problem = ask(PROBLEM_PROMPT)?;
            Dispatch {
                choice,
                task,
                inputs: BTreeMap::from([(PROBLEM_INPUT.to_string(), problem)]),
            }
        }
        TaskChoice::Theoretical => {
            let question = ask(QUESTION_PROMPT)?;
            Dispatch {
                choice,
                task: task.with_question_prefix(&question),
                inputs: BTreeMap::new(),
            }
        }
        TaskChoice::Research => {
            if preset_input.is_some() {
                log::warn!("--input is ignored for the research task");
            }
            Dispatch {
                choice,
                task,
                inputs: BTreeMap::new(),
            }
        }
    };

    log::info!(
        "Dispatching '{}' as task '{}'",
        dispatch.choice,
        dispatch.task.id
    );
    Ok(dispatch)
}
