//! Prompt-related error types.

use promptrail_core::{NotFoundError, PromptrailError, ProviderError, ValidationError};
use thiserror::Error;

/// Errors raised by prompt stores and the renderer.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No template matches the requested name/label.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Template or configuration is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote registry failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A placeholder has no binding.
    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PromptError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(message))
    }

    /// Create a not-found error for a prompt name and label.
    pub fn not_found(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::NotFound(NotFoundError::new("prompt", name).with_label(label))
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

impl From<PromptError> for PromptrailError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::NotFound(e) => Self::NotFound(e),
            PromptError::Validation(e) => Self::Validation(e),
            PromptError::Provider(e) => Self::Provider(e),
            PromptError::MissingVariable(name) => {
                Self::Validation(ValidationError::field(name, "no binding for template variable"))
            }
            PromptError::Serialization(e) => Self::Serialization(e),
        }
    }
}
