//! Agent-specific error types.

use promptrail_core::{PromptrailError, ValidationError};
use promptrail_models::ModelError;
use promptrail_tools::ToolError;
use thiserror::Error;

/// Errors that can end an agent run.
///
/// Nothing is retried: the first failure aborts the run.
#[derive(Debug, Error)]
pub enum AgentRunError {
    /// Model returned an error.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The model asked for a tool that is not configured.
    #[error("Unknown tool '{name}' (available: {})", available.join(", "))]
    UnknownTool {
        /// Requested tool name.
        name: String,
        /// Configured tool names.
        available: Vec<String>,
    },

    /// Tool execution failed.
    #[error("Tool '{tool}' failed: {source}")]
    Tool {
        /// Tool name.
        tool: String,
        /// Underlying failure.
        #[source]
        source: ToolError,
    },

    /// The model kept requesting tools past the iteration cap.
    #[error("Agent did not finish within {max_iterations} model calls")]
    MaxIterationsExceeded {
        /// Configured cap.
        max_iterations: usize,
    },

    /// The agent was built without required settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AgentRunError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a tool failure.
    pub fn tool(tool: impl Into<String>, source: ToolError) -> Self {
        Self::Tool {
            tool: tool.into(),
            source,
        }
    }
}

impl From<AgentRunError> for PromptrailError {
    fn from(err: AgentRunError) -> Self {
        match err {
            AgentRunError::Model(e) => e.into(),
            AgentRunError::Tool { source, .. } => source.into(),
            AgentRunError::UnknownTool { name, .. } => Self::Validation(ValidationError::field(
                "tool",
                format!("unknown tool '{name}'"),
            )),
            AgentRunError::Configuration(message) => Self::Configuration(message),
            other @ AgentRunError::MaxIterationsExceeded { .. } => Self::Internal(other.to_string()),
        }
    }
}
