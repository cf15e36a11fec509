//! Tool error types.

use promptrail_core::{PromptrailError, ProviderError, ValidationError};
use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool execution failed.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// The model supplied arguments the tool cannot use.
    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// What was wrong.
        message: String,
    },

    /// No tool with this name is registered.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The remote service behind the tool failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolError {
    /// Create an execution failure.
    #[must_use]
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(tool: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: msg.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Map a transport error from the HTTP client.
    pub(crate) fn transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Provider(ProviderError::timeout(provider, err.to_string()))
        } else {
            Self::Provider(ProviderError::new(provider, err.to_string()))
        }
    }
}

impl From<ToolError> for PromptrailError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Provider(e) => Self::Provider(e),
            ToolError::InvalidArguments { tool, message } => {
                Self::Validation(ValidationError::field(tool, message))
            }
            ToolError::Json(e) => Self::Serialization(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_passes_through() {
        let err: PromptrailError = ToolError::from(ProviderError::http("tavily", 401, "bad key")).into();
        assert!(err.is_provider());
        assert_eq!(err.to_string(), "tavily error (status 401): bad key");
    }

    #[test]
    fn test_invalid_args_display() {
        let err = ToolError::invalid_args("tavily_search", "missing 'query'");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for 'tavily_search': missing 'query'"
        );
    }
}
