use crate::config::types::CrewSettings;
use crate::context::WorkspaceContext;
use crate::dispatch::Prompter;
use crate::error::{CrewError, Result};
use crate::llm::{CallOptions, Llm, Message};
use crate::tools::{Tool, ToolInput};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// A workspace rooted in a fresh temp directory with default crew settings.
pub(crate) fn test_workspace() -> (TempDir, WorkspaceContext) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    let ctx = WorkspaceContext::new(root.clone(), root.join("crew.yaml"), &CrewSettings::default());
    (temp_dir, ctx)
}

/// An `Llm` that replays canned replies and records every conversation it saw.
pub(crate) struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    pub(crate) fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Llm for ScriptedLlm {
    fn model(&self) -> &str {
        "scripted"
    }

    fn call(&self, messages: &[Message], _options: &CallOptions) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CrewError::LlmError("scripted replies exhausted".to_string()))
    }
}

/// A `Prompter` that answers from a fixed list and records the questions.
pub(crate) struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub(crate) asked: Vec<String>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| CrewError::IoError("no scripted answer left".to_string()))
    }
}

/// A tool that echoes its input, or fails when the input says `fail`.
pub(crate) struct EchoTool;

impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Repeats the input back."
    }

    fn run(&self, input: &ToolInput) -> Result<String> {
        if input.raw() == "fail" {
            return Err(CrewError::tool("echo", "asked to fail"));
        }
        Ok(format!("echo: {}", input.raw()))
    }
}

/// Build a minimal HTTP/1.1 response with a JSON body.
pub(crate) fn http_response(status: u16, body: &str) -> String {
    http_response_with_type(status, "application/json", body)
}

pub(crate) fn http_response_with_type(status: u16, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    )
}

/// Serve `responses` to consecutive connections on a local port.
///
/// Returns the base URL and a handle yielding the raw requests received.
pub(crate) fn serve_responses(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for response in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                if let Some(value) = line
                    .to_ascii_lowercase()
                    .strip_prefix("content-length:")
                {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                let end_of_headers = line == "\r\n";
                request.push_str(&line);
                if end_of_headers {
                    break;
                }
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            request.push_str(&String::from_utf8_lossy(&body));
            requests.push(request);

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        requests
    });

    (base_url, handle)
}
