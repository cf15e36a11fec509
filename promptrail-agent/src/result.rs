//! Result of a finished agent run.

use promptrail_core::{Message, Usage};
use serde::Serialize;

/// Transcript and bookkeeping of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRunResult {
    /// Initial messages followed by every model and tool turn.
    pub transcript: Vec<Message>,
    /// Token usage summed over all model calls.
    pub usage: Usage,
    /// Run ID.
    pub run_id: String,
    /// Number of model calls made.
    pub iterations: usize,
}

impl AgentRunResult {
    /// The terminal assistant answer.
    pub fn final_message(&self) -> Option<&Message> {
        self.transcript.last().filter(|m| m.is_final_answer())
    }

    /// Text of the terminal answer, empty if there is none.
    pub fn output(&self) -> &str {
        self.final_message().map_or("", |m| m.content.as_str())
    }

    /// Messages appended by the run, after the initial ones.
    pub fn new_messages(&self, initial_len: usize) -> &[Message] {
        self.transcript.get(initial_len..).unwrap_or(&[])
    }
}
