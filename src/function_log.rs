//! The logging capability handed to handlers.
//!
//! Every invocation gets its own `FunctionLog`. Lines written to it are kept, in order, so the
//! runtime can return them to the caller, and are also forwarded to `tracing` tagged with the
//! request id.

use std::sync::Mutex;

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

#[derive(Debug)]
pub struct FunctionLog {
    request_id: String,
    lines: Mutex<Vec<(Channel, String)>>,
}

impl FunctionLog {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn info(&self, line: impl Into<String>) {
        let line = line.into();
        info!(request_id = %self.request_id, "{line}");
        self.push(Channel::Stdout, line);
    }

    pub fn error(&self, line: impl Into<String>) {
        let line = line.into();
        error!(request_id = %self.request_id, "{line}");
        self.push(Channel::Stderr, line);
    }

    fn push(&self, channel: Channel, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((channel, line));
        }
    }

    pub fn lines(&self) -> Vec<(Channel, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Lines on `channel` only.
    pub fn channel(&self, channel: Channel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line)
            .collect()
    }

    /// All captured lines as text, newline terminated.
    pub fn tail(&self) -> String {
        self.lines()
            .into_iter()
            .map(|(_, line)| line + "\n")
            .collect()
    }
}
