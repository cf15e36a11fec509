//! Prompt template types.
//!
//! A template is identified by `(name, kind, version)` and is immutable once
//! registered. Labels such as [`LATEST_LABEL`] point at a version and move
//! when a newer version is registered.

use promptrail_core::{ModelConfig, Role, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Label that always points at the newest version of a template.
pub const LATEST_LABEL: &str = "latest";

/// Kind of template body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    /// Ordered role/content message skeletons.
    #[default]
    Chat,
    /// A single string.
    Text,
}

impl PromptKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message skeleton of a chat template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageTemplate {
    /// Role of the rendered message.
    pub role: Role,
    /// Content with `{{variable}}` placeholders.
    pub content: String,
}

impl ChatMessageTemplate {
    /// Create a message skeleton.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message skeleton.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a system message skeleton.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Template body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptBody {
    /// Chat body.
    Chat(Vec<ChatMessageTemplate>),
    /// Text body.
    Text(String),
}

impl PromptBody {
    /// Kind matching this body.
    pub fn kind(&self) -> PromptKind {
        match self {
            Self::Chat(_) => PromptKind::Chat,
            Self::Text(_) => PromptKind::Text,
        }
    }
}

/// A fetched or freshly registered template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name.
    pub name: String,
    /// Version number, starting at 1.
    pub version: u32,
    /// Body kind.
    #[serde(rename = "type")]
    pub kind: PromptKind,
    /// Body.
    #[serde(rename = "prompt")]
    pub body: PromptBody,
    /// Raw configuration blob.
    #[serde(default)]
    pub config: JsonValue,
    /// Labels currently pointing at this version.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PromptTemplate {
    /// Typed model configuration attached to the template.
    pub fn model_config(&self) -> Result<ModelConfig, ValidationError> {
        ModelConfig::from_json(&self.config)
    }

    /// Check whether a label currently points at this version.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Request to register a new template version.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrompt {
    /// Template name.
    pub name: String,
    /// Body kind.
    pub kind: PromptKind,
    /// Body.
    pub body: PromptBody,
    /// Model configuration.
    pub config: ModelConfig,
    /// Labels to point at the new version, besides `latest`.
    pub labels: Vec<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

impl NewPrompt {
    /// A chat template.
    pub fn chat(
        name: impl Into<String>,
        messages: Vec<ChatMessageTemplate>,
        config: ModelConfig,
    ) -> Self {
        Self {
            name: name.into(),
            kind: PromptKind::Chat,
            body: PromptBody::Chat(messages),
            config,
            labels: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// A text template.
    pub fn text(name: impl Into<String>, text: impl Into<String>, config: ModelConfig) -> Self {
        Self {
            name: name.into(),
            kind: PromptKind::Text,
            body: PromptBody::Text(text.into()),
            config,
            labels: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Add a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check the registration constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "prompt name cannot be empty"));
        }
        if self.body.kind() != self.kind {
            return Err(ValidationError::field(
                "prompt",
                format!(
                    "body is a {} prompt but type is {}",
                    self.body.kind(),
                    self.kind
                ),
            ));
        }
        if let PromptBody::Chat(messages) = &self.body {
            if messages.is_empty() {
                return Err(ValidationError::field(
                    "prompt",
                    "chat prompts need at least one message",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ModelConfig {
        ModelConfig::new("m1", 0.5).unwrap()
    }

    #[test]
    fn test_body_untagged_serde() {
        let chat: PromptBody =
            serde_json::from_value(serde_json::json!([{"role": "user", "content": "{{city}}"}]))
                .unwrap();
        assert_eq!(chat.kind(), PromptKind::Chat);

        let text: PromptBody = serde_json::from_value(serde_json::json!("hi {{name}}")).unwrap();
        assert_eq!(text, PromptBody::Text("hi {{name}}".into()));
    }

    #[test]
    fn test_validate_ok() {
        let prompt = NewPrompt::chat("greet", vec![ChatMessageTemplate::user("hi")], config());
        assert!(prompt.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let prompt = NewPrompt::text("  ", "hi", config());
        assert_eq!(prompt.validate().unwrap_err().field.as_deref(), Some("name"));
    }

    #[test]
    fn test_validate_empty_chat() {
        let prompt = NewPrompt::chat("greet", vec![], config());
        assert!(prompt.validate().is_err());
    }

    #[test]
    fn test_validate_kind_mismatch() {
        let mut prompt = NewPrompt::text("greet", "hi", config());
        prompt.kind = PromptKind::Chat;
        assert!(prompt.validate().is_err());
    }

    #[test]
    fn test_model_config_extraction() {
        let template = PromptTemplate {
            name: "greet".into(),
            version: 1,
            kind: PromptKind::Chat,
            body: PromptBody::Chat(vec![ChatMessageTemplate::user("hi")]),
            config: serde_json::json!({"model": "m1", "temperature": 0.5}),
            labels: vec![LATEST_LABEL.into()],
            tags: vec![],
        };
        assert_eq!(template.model_config().unwrap(), config());
        assert!(template.has_label("latest"));
        assert!(!template.has_label("production"));
    }
}
