//! Tool return types.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::errors::ToolError;

/// Result of a tool execution.
pub type ToolResult = Result<ToolReturn, ToolError>;

/// What a tool returns after execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReturn {
    /// Plain text.
    Text(String),
    /// Structured JSON.
    Json(JsonValue),
}

impl ToolReturn {
    /// Create a text return.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create a JSON return.
    #[must_use]
    pub fn json(value: JsonValue) -> Self {
        Self::Json(value)
    }

    /// Create a JSON return from a serializable value.
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Get the content as text if applicable.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    /// Get the content as JSON if applicable.
    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// Content of the `tool` message appended to the transcript.
    #[must_use]
    pub fn to_message_content(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }
}

impl From<String> for ToolReturn {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ToolReturn {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<JsonValue> for ToolReturn {
    fn from(v: JsonValue) -> Self {
        Self::Json(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_content() {
        assert_eq!(ToolReturn::text("ok").to_message_content(), "ok");
        assert_eq!(
            ToolReturn::json(serde_json::json!({"a": 1})).to_message_content(),
            r#"{"a":1}"#
        );
    }
}
