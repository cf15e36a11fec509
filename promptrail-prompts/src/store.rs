//! Prompt store trait.

use async_trait::async_trait;

use crate::error::PromptError;
use crate::template::{NewPrompt, PromptKind, PromptTemplate, LATEST_LABEL};

/// A registry of versioned, labeled prompt templates.
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Register a new template version.
    ///
    /// The prompt is validated before anything is stored or sent.
    async fn register(&self, prompt: NewPrompt) -> Result<PromptTemplate, PromptError>;

    /// Fetch the version a label points at.
    ///
    /// Fails with [`PromptError::NotFound`] when the name or label is
    /// unknown, and with [`PromptError::Validation`] when the stored kind
    /// differs from `kind`.
    async fn fetch(
        &self,
        name: &str,
        kind: PromptKind,
        label: &str,
    ) -> Result<PromptTemplate, PromptError>;

    /// Fetch the `latest` chat template with this name.
    async fn fetch_latest(&self, name: &str) -> Result<PromptTemplate, PromptError> {
        self.fetch(name, PromptKind::Chat, LATEST_LABEL).await
    }
}

pub(crate) fn check_kind(
    template: PromptTemplate,
    expected: PromptKind,
) -> Result<PromptTemplate, PromptError> {
    if template.kind != expected {
        return Err(PromptError::validation(format!(
            "prompt '{}' is a {} prompt, requested {}",
            template.name, template.kind, expected
        )));
    }
    Ok(template)
}
