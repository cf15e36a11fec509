//! Conversation message types.
//!
//! A conversation is an ordered `Vec<Message>`. Template rendering produces
//! the initial turns; model and tool invocations append the rest.
//!
//! ## Example
//!
//! ```rust
//! use promptrail_core::messages::{Message, Role, ToolCall};
//!
//! let call = ToolCall::new("tavily_search", serde_json::json!({"query": "rust"}));
//! let request = Message::assistant_tool_calls("", vec![call.clone()]);
//! let result = Message::tool(&call.id, "tavily_search", "[...]");
//!
//! assert!(request.has_tool_calls());
//! assert_eq!(result.role, Role::Tool);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::identifier::generate_tool_call_id;

/// Width of the banner printed by [`Message::pretty`].
const BANNER_WIDTH: usize = 80;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// Result of a tool execution.
    Tool,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }

    /// Parse a role, accepting the common aliases used by chat frameworks.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Self::System),
            "user" | "human" => Some(Self::User),
            "assistant" | "ai" => Some(Self::Assistant),
            "tool" => Some(Self::Tool),
            _ => None,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::System => "System Message",
            Self::User => "Human Message",
            Self::Assistant => "Ai Message",
            Self::Tool => "Tool Message",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call ID, echoed back on the matching tool result.
    pub id: String,
    /// Name of the tool to call.
    pub name: String,
    /// Arguments as JSON.
    pub arguments: JsonValue,
}

impl ToolCall {
    /// Create a tool call with a generated ID.
    pub fn new(name: impl Into<String>, arguments: JsonValue) -> Self {
        Self {
            id: generate_tool_call_id(),
            name: name.into(),
            arguments,
        }
    }

    /// Set the call ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// A single role-tagged conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the author.
    pub role: Role,
    /// Text content.
    pub content: String,
    /// Tool calls requested by an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool messages: the call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// For tool messages: the tool that produced the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    /// Create a message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant message requesting tool calls.
    pub fn assistant_tool_calls(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::assistant(content)
        }
    }

    /// Create a tool result message.
    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Check if this message requests any tool call.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Check if this is an assistant message without tool calls.
    pub fn is_final_answer(&self) -> bool {
        self.role == Role::Assistant && self.tool_calls.is_empty()
    }

    /// Render the message for terminal output.
    ///
    /// ```rust
    /// use promptrail_core::Message;
    ///
    /// let text = Message::user("hello").pretty();
    /// assert!(text.starts_with("================================ Human Message"));
    /// assert!(text.ends_with("\n\nhello"));
    /// ```
    pub fn pretty(&self) -> String {
        let mut out = banner(self.role.title());
        if let Some(ref name) = self.name {
            out.push_str("\nName: ");
            out.push_str(name);
        }
        out.push_str("\n\n");
        out.push_str(&self.content);

        if !self.tool_calls.is_empty() {
            out.push_str("\nTool Calls:");
            for call in &self.tool_calls {
                out.push_str(&format!("\n  {} ({})", call.name, call.id));
                out.push_str(&format!("\n Call ID: {}", call.id));
                out.push_str("\n  Args:");
                match &call.arguments {
                    JsonValue::Object(map) => {
                        for (key, value) in map {
                            let value = match value {
                                JsonValue::String(s) => s.clone(),
                                other => other.to_string(),
                            };
                            out.push_str(&format!("\n    {}: {}", key, value));
                        }
                    }
                    other => out.push_str(&format!("\n    {}", other)),
                }
            }
        }
        out
    }
}

fn banner(title: &str) -> String {
    let padded = format!(" {} ", title);
    let len = padded.chars().count();
    let sep = "=".repeat(BANNER_WIDTH.saturating_sub(len) / 2);
    let trailing = if len % 2 == 1 {
        format!("{}=", sep)
    } else {
        sep.clone()
    };
    format!("{}{}{}", sep, padded, trailing)
}
