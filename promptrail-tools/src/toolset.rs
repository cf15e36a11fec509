//! Ordered set of tools available to an agent.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::{
    definition::ToolDefinition,
    errors::ToolError,
    return_types::ToolResult,
    tool::{BoxedTool, Tool},
};

/// Tools keyed by exact name, kept in registration order.
///
/// Registering a tool under an existing name replaces it in place.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: IndexMap<String, BoxedTool>,
}

impl ToolSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool.
    pub fn insert<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.insert_arc(Arc::new(tool))
    }

    /// Add a shared tool.
    pub fn insert_arc(&mut self, tool: BoxedTool) -> &mut Self {
        self.tools.insert(tool.name(), tool);
        self
    }

    /// Add a tool, builder style.
    #[must_use]
    pub fn with<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.insert(tool);
        self
    }

    /// Look up a tool by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoxedTool> {
        self.tools.get(name)
    }

    /// Check whether a tool is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions of every tool, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Call a tool by name.
    pub async fn call(&self, name: &str, args: JsonValue) -> ToolResult {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;
        tool.call(args).await
    }

    /// Number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if there are no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FunctionTool, ToolReturn};

    fn named(name: &'static str) -> impl Tool {
        FunctionTool::new(name, "test tool", JsonValue::Null, move |_args: JsonValue| async move {
            Ok(ToolReturn::text(name))
        })
    }

    #[tokio::test]
    async fn test_call_by_exact_name() {
        let tools = ToolSet::new().with(named("search")).with(named("Search"));
        assert_eq!(tools.len(), 2);

        let out = tools.call("Search", JsonValue::Null).await.unwrap();
        assert_eq!(out.as_text(), Some("Search"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let tools = ToolSet::new().with(named("search"));
        let err = tools.call("searc", JsonValue::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref n) if n == "searc"));
    }

    #[test]
    fn test_definitions_in_registration_order() {
        let tools = ToolSet::new().with(named("b")).with(named("a")).with(named("b"));
        let names: Vec<String> = tools.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(tools.contains("a"));
    }
}
