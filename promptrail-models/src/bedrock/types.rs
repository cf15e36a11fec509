//! Bedrock Converse API wire types.
//!
//! Content blocks are single-key objects: `{"text": ".."}`,
//! `{"toolUse": {..}}`, `{"toolResult": {..}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Converse API request body. The model id travels in the URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseRequest {
    /// Conversation turns.
    pub messages: Vec<ConverseMessage>,
    /// System prompt blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<SystemBlock>,
    /// Sampling settings.
    pub inference_config: InferenceConfig,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

/// A system prompt block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemBlock {
    /// Text.
    pub text: String,
}

/// Converse message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConverseRole {
    /// User turn, also carries tool results.
    User,
    /// Assistant turn.
    Assistant,
}

/// A conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverseMessage {
    /// Role.
    pub role: ConverseRole,
    /// Content blocks.
    pub content: Vec<ContentBlock>,
}

/// A content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentBlock {
    /// Text.
    Text(String),
    /// Tool call from the model.
    ToolUse(ToolUseBlock),
    /// Tool output sent back to the model.
    ToolResult(ToolResultBlock),
    /// Any block kind this client does not handle (reasoning, images).
    #[serde(untagged)]
    Unknown(JsonValue),
}

/// Tool call from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUseBlock {
    /// Call ID.
    pub tool_use_id: String,
    /// Tool name.
    pub name: String,
    /// Tool arguments.
    pub input: JsonValue,
}

/// Tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultBlock {
    /// Call ID this result answers.
    pub tool_use_id: String,
    /// Result content.
    pub content: Vec<ToolResultContent>,
    /// `success` or `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Tool result content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolResultContent {
    /// Text result.
    Text(String),
    /// JSON result.
    Json(JsonValue),
}

/// Sampling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Max tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tools.
    pub tools: Vec<ToolEntry>,
}

/// Tool list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEntry {
    /// Tool specification.
    pub tool_spec: ToolSpec,
}

/// Tool specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Input schema.
    pub input_schema: ToolInputSchema,
}

/// Tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    /// JSON schema.
    pub json: JsonValue,
}

/// Converse API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseResponse {
    /// Output.
    pub output: Option<ConverseOutput>,
    /// Stop reason.
    pub stop_reason: Option<String>,
    /// Usage.
    pub usage: Option<ConverseUsage>,
}

/// Response output.
#[derive(Debug, Clone, Deserialize)]
pub struct ConverseOutput {
    /// Message.
    pub message: Option<ConverseMessage>,
}

/// Usage statistics.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseUsage {
    /// Input tokens.
    pub input_tokens: u64,
    /// Output tokens.
    pub output_tokens: u64,
}
