//! Web search: the backend trait, the Tavily client and the agent tool.

mod tavily;
mod web_search;

pub use tavily::{TavilyClient, TavilySearchDepth};
pub use web_search::WebSearchTool;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ToolError;

/// Search category understood by the search provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// General web search.
    #[default]
    General,
    /// News articles.
    News,
    /// Financial sources.
    Finance,
}

impl Topic {
    /// Wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Finance => "finance",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "news" => Ok(Self::News),
            "finance" => Ok(Self::Finance),
            other => Err(ToolError::execution_failed(format!("unknown topic '{other}'"))),
        }
    }
}

/// One search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Upper bound on returned snippets.
    pub max_results: usize,
    /// Search category.
    pub topic: Topic,
}

impl SearchRequest {
    /// Create a request with the general topic.
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
            topic: Topic::General,
        }
    }

    /// Set the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }
}

/// A web search provider.
///
/// Implementations return at most `max_results` content snippets in the
/// provider's relevance order.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<String>, ToolError>;
}

/// Backend that answers every query with the same snippets.
///
/// Records the requests it receives.
#[derive(Debug, Default)]
pub struct StaticSearchBackend {
    snippets: Vec<String>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StaticSearchBackend {
    /// Create a backend returning these snippets.
    pub fn new<I, S>(snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            snippets: snippets.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SearchBackend for StaticSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<String>, ToolError> {
        self.requests.lock().push(request.clone());
        Ok(self
            .snippets
            .iter()
            .take(request.max_results)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("general", Topic::General)]
    #[case("News", Topic::News)]
    #[case(" finance ", Topic::Finance)]
    fn test_topic_parse(#[case] input: &str, #[case] expected: Topic) {
        assert_eq!(input.parse::<Topic>().unwrap(), expected);
    }

    #[test]
    fn test_topic_rejects_unknown() {
        assert!("sports".parse::<Topic>().is_err());
    }

    #[tokio::test]
    async fn test_static_backend_truncates() {
        let backend = StaticSearchBackend::new(["a", "b", "c"]);
        let out = backend.search(&SearchRequest::new("q", 2)).await.unwrap();
        assert_eq!(out, vec!["a", "b"]);
        assert_eq!(backend.requests()[0].query, "q");
    }
}
