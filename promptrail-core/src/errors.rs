//! Error types for promptrail.
//!
//! Four error kinds matter to callers: a template that does not exist
//! ([`NotFoundError`]), malformed input ([`ValidationError`]), a failing
//! remote service ([`ProviderError`]) and a trace export that could not be
//! delivered ([`TracingDeliveryError`]). The first three propagate unchanged
//! to the top-level caller. The last one is only ever logged.

use std::fmt;
use thiserror::Error;

/// The main error type for promptrail operations.
#[derive(Error, Debug)]
pub enum PromptrailError {
    /// A prompt template name or label does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Malformed template, configuration or variable binding.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A remote endpoint returned an error or could not be reached.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Trace export failed.
    #[error(transparent)]
    TracingDelivery(#[from] TracingDeliveryError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or invalid process configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using [`PromptrailError`].
pub type Result<T> = std::result::Result<T, PromptrailError>;

impl PromptrailError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a provider error.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// A named resource could not be found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    /// Kind of resource ("prompt", "tool", ...).
    pub resource: String,
    /// Resource name.
    pub name: String,
    /// Label or version that was requested, if any.
    pub label: Option<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' not found", self.resource, self.name)?;
        if let Some(ref label) = self.label {
            write!(f, " (label: {})", label)?;
        }
        Ok(())
    }
}

impl NotFoundError {
    /// Create a new not-found error.
    pub fn new(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            name: name.into(),
            label: None,
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Input failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message.
    pub message: String,
    /// Field that failed validation, if applicable.
    pub field: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(ref field) => write!(f, "Validation error on '{}': {}", field, self.message),
            None => write!(f, "Validation error: {}", self.message),
        }
    }
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error for a specific field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// A remote service (model, search or prompt store) failed.
#[derive(Error, Debug, Clone)]
pub struct ProviderError {
    /// Provider name ("bedrock", "tavily", "langfuse", ...).
    pub provider: String,
    /// HTTP status code, when the failure came with one.
    pub status: Option<u16>,
    /// Error message.
    pub message: String,
    /// Whether the failure was a timeout.
    pub is_timeout: bool,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error", self.provider)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }
        if self.is_timeout {
            write!(f, " (timeout)")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl ProviderError {
    /// Create a new provider error.
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: None,
            message: message.into(),
            is_timeout: false,
        }
    }

    /// Create a provider error from an HTTP status and body.
    pub fn http(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(provider, body)
        }
    }

    /// Create a timeout error.
    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_timeout: true,
            ..Self::new(provider, message)
        }
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.status == Some(429)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        self.status.map_or(false, |s| s >= 500)
    }
}

/// Trace records could not be shipped to the collector.
#[derive(Error, Debug, Clone)]
pub struct TracingDeliveryError {
    /// Error message.
    pub message: String,
    /// Number of records in the failed batch.
    pub records: usize,
}

impl fmt::Display for TracingDeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trace delivery failed for {} record(s): {}",
            self.records, self.message
        )
    }
}

impl TracingDeliveryError {
    /// Create a new delivery error.
    pub fn new(message: impl Into<String>, records: usize) -> Self {
        Self {
            message: message.into(),
            records,
        }
    }
}
