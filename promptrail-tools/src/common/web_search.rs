//! Web search exposed as an agent tool.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use super::{SearchBackend, SearchRequest, Topic};
use crate::{
    definition::{ObjectJsonSchema, ToolDefinition},
    errors::ToolError,
    return_types::{ToolResult, ToolReturn},
    tool::Tool,
};

/// Agent tool running web searches through a [`SearchBackend`].
///
/// The model supplies the query and may pick a topic; the result count is
/// fixed when the tool is built and the built topic is the fallback.
#[derive(Clone)]
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
    topic: Topic,
}

impl WebSearchTool {
    /// Tool name advertised to the model.
    pub const NAME: &'static str = "tavily_search";
    /// Default number of results.
    pub const DEFAULT_MAX_RESULTS: usize = 2;

    /// Create a tool over a backend with the default settings.
    pub fn new(backend: impl SearchBackend + 'static) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a tool over a shared backend.
    pub fn from_arc(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            max_results: Self::DEFAULT_MAX_RESULTS,
            topic: Topic::General,
        }
    }

    /// Set the number of results.
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }

    /// Configured number of results.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Configured topic.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "A search engine optimized for comprehensive, accurate, and trusted results. \
             Useful for when you need to answer questions about current events. \
             Input should be a search query.",
        )
        .with_parameters(
            ObjectJsonSchema::new()
                .string("query", "Search query to look up", true)
                .enum_values(
                    "topic",
                    "Category of the search",
                    &[
                        Topic::General.as_str(),
                        Topic::News.as_str(),
                        Topic::Finance.as_str(),
                    ],
                    false,
                ),
        )
    }

    async fn call(&self, args: JsonValue) -> ToolResult {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_args(Self::NAME, "missing required 'query' parameter"))?;
        if query.trim().is_empty() {
            return Err(ToolError::invalid_args(Self::NAME, "query cannot be empty"));
        }

        let topic = match args.get("topic").and_then(JsonValue::as_str) {
            Some(raw) => raw.parse::<Topic>().map_err(|_| {
                ToolError::invalid_args(Self::NAME, format!("unknown topic '{raw}'"))
            })?,
            None => self.topic,
        };

        let request = SearchRequest::new(query, self.max_results).with_topic(topic);
        let results = self.backend.search(&request).await?;

        Ok(ToolReturn::json(serde_json::json!({
            "query": query,
            "results": results,
        })))
    }
}

impl std::fmt::Debug for WebSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchTool")
            .field("max_results", &self.max_results)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}
