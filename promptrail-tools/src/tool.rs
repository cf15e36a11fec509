//! Core tool trait and the closure-backed [`FunctionTool`].

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::sync::Arc;

use crate::{definition::ToolDefinition, return_types::ToolResult};

/// Core trait for all tools.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use promptrail_tools::{Tool, ToolDefinition, ToolResult, ToolReturn};
///
/// struct GreetTool;
///
/// #[async_trait]
/// impl Tool for GreetTool {
///     fn definition(&self) -> ToolDefinition {
///         ToolDefinition::new("greet", "Greet someone")
///     }
///
///     async fn call(&self, args: serde_json::Value) -> ToolResult {
///         let name = args["name"].as_str().unwrap_or("World");
///         Ok(ToolReturn::text(format!("Hello, {name}!")))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameter schema sent to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the arguments the model supplied.
    async fn call(&self, args: JsonValue) -> ToolResult;

    /// Get the tool name.
    fn name(&self) -> String {
        self.definition().name
    }
}

/// Type-erased shared tool.
pub type BoxedTool = Arc<dyn Tool>;

/// Tool backed by an async closure.
///
/// ```rust
/// use promptrail_tools::{FunctionTool, ObjectJsonSchema, Tool, ToolReturn};
///
/// let tool = FunctionTool::new(
///     "shout",
///     "Upper-case a phrase",
///     ObjectJsonSchema::new().string("text", "Phrase", true),
///     |args: serde_json::Value| async move {
///         let text = args["text"].as_str().unwrap_or_default();
///         Ok(ToolReturn::text(text.to_uppercase()))
///     },
/// );
/// assert_eq!(tool.name(), "shout");
/// ```
pub struct FunctionTool<F> {
    definition: ToolDefinition,
    function: F,
}

impl<F> FunctionTool<F> {
    /// Create a new function tool.
    pub fn new<Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: impl Into<JsonValue>,
        function: F,
    ) -> Self
    where
        F: Fn(JsonValue) -> Fut + Send + Sync,
        Fut: Future<Output = ToolResult> + Send,
    {
        Self {
            definition: ToolDefinition::new(name, description).with_parameters(parameters),
            function,
        }
    }
}

#[async_trait]
impl<F, Fut> Tool for FunctionTool<F>
where
    F: Fn(JsonValue) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult> + Send,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn call(&self, args: JsonValue) -> ToolResult {
        (self.function)(args).await
    }
}

impl<F> std::fmt::Debug for FunctionTool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}
