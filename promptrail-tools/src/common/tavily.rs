//! Tavily search client.
//!
//! Tavily is a search API built for LLM consumption. The client posts
//! `{api_key, query, max_results, topic, search_depth}` to `/search` and
//! keeps the `content` of each result.
//!
//! The API key can be provided directly or via the `TAVILY_API_KEY`
//! environment variable.

use async_trait::async_trait;
use promptrail_core::ProviderError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

use super::{SearchBackend, SearchRequest};
use crate::errors::ToolError;

const PROVIDER: &str = "tavily";

/// Search depth for Tavily queries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TavilySearchDepth {
    /// Basic search (faster, less comprehensive).
    #[default]
    Basic,
    /// Advanced search (slower, more comprehensive).
    Advanced,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyApiResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyApiResult {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TavilyErrorResponse {
    detail: Option<TavilyErrorDetail>,
    message: Option<String>,
}

/// `detail` is either a string or `{"error": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TavilyErrorDetail {
    Text(String),
    Object { error: String },
}

impl TavilyErrorResponse {
    fn into_message(self) -> Option<String> {
        match self.detail {
            Some(TavilyErrorDetail::Text(s)) => Some(s),
            Some(TavilyErrorDetail::Object { error }) => Some(error),
            None => self.message,
        }
    }
}

/// Tavily API client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    api_key: String,
    base_url: String,
    search_depth: TavilySearchDepth,
    client: Client,
}

impl TavilyClient {
    /// Public API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.tavily.com";

    /// Create a client with an API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            search_depth: TavilySearchDepth::Basic,
            client: Self::http_client(Duration::from_secs(30)),
        }
    }

    /// Create a client from the `TAVILY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ToolError> {
        let api_key = env::var("TAVILY_API_KEY").map_err(|_| {
            ToolError::execution_failed("TAVILY_API_KEY environment variable not set")
        })?;
        Ok(Self::new(api_key))
    }

    fn http_client(timeout: Duration) -> Client {
        Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default()
    }

    /// Point the client at another host.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the search depth.
    #[must_use]
    pub fn with_search_depth(mut self, depth: TavilySearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::http_client(timeout);
        self
    }
}

#[async_trait]
impl SearchBackend for TavilyClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<String>, ToolError> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": request.query,
            "max_results": request.max_results,
            "topic": request.topic,
            "search_depth": self.search_depth,
        });
        debug!(query = %request.query, max_results = request.max_results, topic = %request.topic, "Tavily search");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TavilyErrorResponse>(&text)
                .ok()
                .and_then(TavilyErrorResponse::into_message)
                .unwrap_or_else(|| format!("Tavily API returned status: {status}"));
            return Err(ProviderError::http(PROVIDER, status.as_u16(), message).into());
        }

        let parsed: TavilyResponse = response.json().await.map_err(|e| {
            ToolError::Provider(ProviderError::new(
                PROVIDER,
                format!("Failed to parse response: {e}"),
            ))
        })?;

        Ok(parsed
            .results
            .into_iter()
            .take(request.max_results)
            .map(|r| r.content)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Topic;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_returns_contents_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "api_key": "tvly-test",
                "query": "AI agents",
                "max_results": 2,
                "topic": "news",
                "search_depth": "basic"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "AI agents",
                "results": [
                    {"title": "A", "url": "https://a", "content": "first", "score": 0.9},
                    {"title": "B", "url": "https://b", "content": "second", "score": 0.8},
                    {"title": "C", "url": "https://c", "content": "third", "score": 0.7}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TavilyClient::new("tvly-test").with_base_url(server.uri());
        let request = SearchRequest::new("AI agents", 2).with_topic(Topic::News);
        let results = client.search(&request).await.unwrap();
        assert_eq!(results, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_search_error_uses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": {"error": "Unauthorized: missing or invalid API key."}})),
            )
            .mount(&server)
            .await;

        let client = TavilyClient::new("bad").with_base_url(server.uri());
        match client.search(&SearchRequest::new("q", 3)).await.unwrap_err() {
            ToolError::Provider(e) => {
                assert_eq!(e.status, Some(401));
                assert!(e.message.starts_with("Unauthorized"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_search_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = TavilyClient::new("k").with_base_url(server.uri());
        match client.search(&SearchRequest::new("q", 3)).await.unwrap_err() {
            ToolError::Provider(e) => assert!(e.is_server_error()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
