//! Core model trait and request/response types.

use async_trait::async_trait;
use promptrail_core::{Message, ModelConfig, ToolCall, Usage};
use promptrail_tools::ToolDefinition;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ModelError;

/// One model invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRequest {
    /// Model identifier and sampling settings.
    pub config: ModelConfig,
    /// System instructions sent separately from the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Conversation so far.
    pub messages: Vec<Message>,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

impl ModelRequest {
    /// Create a request without system prompt or tools.
    pub fn new(config: ModelConfig, messages: Vec<Message>) -> Self {
        Self {
            config,
            system: None,
            messages,
            tools: Vec::new(),
        }
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the tool definitions.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of turn.
    EndTurn,
    /// The model wants tools executed.
    ToolUse,
    /// Token limit reached.
    MaxTokens,
    /// A stop sequence matched.
    StopSequence,
    /// Output was blocked by a content filter.
    ContentFiltered,
    /// Provider-specific reason.
    Other(String),
}

impl FinishReason {
    /// Map a provider stop reason string.
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "end_turn" | "stop" => Self::EndTurn,
            "tool_use" => Self::ToolUse,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            "content_filtered" | "guardrail_intervened" => Self::ContentFiltered,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Result of one model invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Assistant message, possibly carrying tool calls.
    pub message: Message,
    /// Why generation stopped.
    pub finish_reason: Option<FinishReason>,
    /// Token usage of this call.
    pub usage: Usage,
    /// Model that produced the response.
    pub model_id: String,
}

impl ModelResponse {
    /// A plain text answer.
    pub fn text(model_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(text),
            finish_reason: Some(FinishReason::EndTurn),
            usage: Usage::default(),
            model_id: model_id.into(),
        }
    }

    /// An answer requesting tool calls.
    pub fn tool_calls(
        model_id: impl Into<String>,
        text: impl Into<String>,
        calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            message: Message::assistant_tool_calls(text, calls),
            finish_reason: Some(FinishReason::ToolUse),
            usage: Usage::default(),
            model_id: model_id.into(),
        }
    }

    /// Set the usage.
    #[must_use]
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Text content of the message.
    pub fn text_content(&self) -> &str {
        &self.message.content
    }
}

/// A hosted chat model.
///
/// Implementations perform exactly one network call per `invoke` and do
/// not retry.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model name.
    fn name(&self) -> &str;

    /// Provider system (bedrock, mock, ...).
    fn system(&self) -> &str;

    /// Full model identifier.
    fn identifier(&self) -> String {
        format!("{}:{}", self.system(), self.name())
    }

    /// Send one request.
    async fn invoke(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;
}

/// Shared model for dynamic dispatch.
pub type BoxedModel = Arc<dyn ChatModel>;

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn system(&self) -> &str {
        (**self).system()
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        (**self).invoke(request).await
    }
}
