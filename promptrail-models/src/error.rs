//! Model-related error types.

use promptrail_core::{PromptrailError, ProviderError};
use thiserror::Error;

/// Model-related errors.
///
/// Nothing here is retried locally; every variant surfaces to the caller.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP error from the API.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Request timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The endpoint could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid response from the API.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing credentials or bad client settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert into the shared provider error, naming the provider.
    pub fn into_provider_error(self, provider: &str) -> ProviderError {
        match self {
            Self::Http { status, body } => ProviderError::http(provider, status, body),
            Self::Timeout(message) => ProviderError::timeout(provider, message),
            other => ProviderError::new(provider, other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Other(err.into())
        }
    }
}

impl From<ModelError> for PromptrailError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Configuration(message) => Self::Configuration(message),
            other => Self::Provider(other.into_provider_error("model")),
        }
    }
}
