//! Traced web research: query generation, search, report writing.
//!
//! Every step is an observation of its own, nested under
//! `execute_research_workflow`.

use promptrail_core::{Message, ModelConfig, PromptrailError};
use promptrail_models::{BoxedModel, ChatModel, ModelError, ModelRequest};
use promptrail_tools::{SearchBackend, SearchRequest};
use promptrail_tracing::Tracer;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// System prompt for turning a question into one search query.
pub const QUERY_SYSTEM_PROMPT: &str = "ユーザからの問い合わせ内容をWeb検索し、レポートを作成します。\n\
Web検索用のクエリを1つ作成してください。検索単語以外は回答しないでください。";

/// System prompt for writing the Markdown report.
pub const REPORT_SYSTEM_PROMPT: &str = "Web検索した結果とユーザクエリを元にMarkdownのレポートを作成してください。\n\
タイトルと見出しも作成してください";

/// Question → search query → search results → Markdown report.
#[derive(Clone)]
pub struct ResearchWorkflow {
    model: BoxedModel,
    search: Arc<dyn SearchBackend>,
    config: ModelConfig,
    tracer: Tracer,
    max_results: usize,
}

impl std::fmt::Debug for ResearchWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchWorkflow")
            .field("model", &self.model.identifier())
            .field("config", &self.config)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl ResearchWorkflow {
    /// Search results fetched per question.
    pub const DEFAULT_MAX_RESULTS: usize = 3;

    /// Create a workflow with tracing disabled.
    pub fn new<M, S>(model: M, search: S, config: ModelConfig) -> Self
    where
        M: ChatModel + 'static,
        S: SearchBackend + 'static,
    {
        Self::from_arcs(Arc::new(model), Arc::new(search), config)
    }

    /// Create a workflow from shared clients.
    pub fn from_arcs(model: BoxedModel, search: Arc<dyn SearchBackend>, config: ModelConfig) -> Self {
        Self {
            model,
            search,
            config,
            tracer: Tracer::disabled(),
            max_results: Self::DEFAULT_MAX_RESULTS,
        }
    }

    /// Observe every step with `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Set the number of search results.
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Ask the model for a single web search query.
    pub async fn generate_web_search_query(&self, user_query: &str) -> Result<String, PromptrailError> {
        self.tracer
            .observe("generate_web_search_query", user_query, self.search_query(user_query))
            .await
    }

    /// Fetch result snippets for `search_query`.
    pub async fn search_web_content(&self, search_query: &str) -> Result<Vec<String>, PromptrailError> {
        let input = json!({
            "search_query": search_query,
            "max_results": self.max_results,
        });
        self.tracer
            .observe("search_web_content", input, self.fetch_contents(search_query))
            .await
    }

    /// Write a Markdown report from the query and the search results.
    pub async fn generate_markdown_report(
        &self,
        user_query: &str,
        search_contents: &[String],
    ) -> Result<String, PromptrailError> {
        let input = json!({
            "user_query": user_query,
            "search_contents": search_contents,
        });
        let prompt = format!(
            "ユーザの質問: {user_query}\n\n web検索結果: {}",
            search_contents.join("\n")
        );
        self.tracer
            .observe(
                "generate_markdown_report",
                input,
                self.complete(REPORT_SYSTEM_PROMPT, prompt),
            )
            .await
    }

    /// Run all three steps.
    ///
    /// The report is written against the generated search query, not the
    /// original question.
    pub async fn execute(&self, user_query: &str) -> Result<String, PromptrailError> {
        self.tracer
            .observe("execute_research_workflow", user_query, self.run_steps(user_query))
            .await
    }

    async fn run_steps(&self, user_query: &str) -> Result<String, PromptrailError> {
        let search_query = self.generate_web_search_query(user_query).await?;
        let contents = self.search_web_content(&search_query).await?;
        let report = self.generate_markdown_report(&search_query, &contents).await?;
        info!(
            search_query = %search_query,
            results = contents.len(),
            report_len = report.len(),
            "Research workflow finished"
        );
        Ok(report)
    }

    async fn search_query(&self, user_query: &str) -> Result<String, PromptrailError> {
        let prompt = format!("ユーザの質問: {user_query}");
        let query = self.complete(QUERY_SYSTEM_PROMPT, prompt).await?;
        Ok(query.trim().to_string())
    }

    async fn fetch_contents(&self, search_query: &str) -> Result<Vec<String>, PromptrailError> {
        let request = SearchRequest::new(search_query, self.max_results);
        let contents = self.search.search(&request).await?;
        debug!(query = search_query, results = contents.len(), "Search finished");
        Ok(contents)
    }

    async fn complete(&self, system: &str, prompt: String) -> Result<String, PromptrailError> {
        let request = ModelRequest::new(self.config.clone(), vec![Message::user(prompt)])
            .with_system(system);
        let response = self.model.invoke(&request).await?;
        if response.text_content().is_empty() {
            return Err(ModelError::invalid_response("model returned no text").into());
        }
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptrail_models::MockModel;
    use promptrail_tools::{StaticSearchBackend, ToolError};
    use promptrail_tracing::MemoryCollector;
    use promptrail_core::{ProviderError, TracingSettings};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn config() -> ModelConfig {
        ModelConfig::new("m1", 1.0).unwrap()
    }

    #[tokio::test]
    async fn test_execute_chains_steps() {
        let model = Arc::new(
            MockModel::new("m1")
                .with_text_response("  LangChain LangGraph 違い\n")
                .with_text_response("# レポート"),
        );
        let search = Arc::new(StaticSearchBackend::new(["one", "two"]));
        let workflow = ResearchWorkflow::from_arcs(model.clone(), search.clone(), config());

        let report = workflow.execute("違いを教えて").await.unwrap();
        assert_eq!(report, "# レポート");

        let searches = search.requests();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].query, "LangChain LangGraph 違い");
        assert_eq!(searches[0].max_results, 3);

        let requests = model.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].system.as_deref(), Some(QUERY_SYSTEM_PROMPT));
        assert_eq!(requests[0].messages, vec![Message::user("ユーザの質問: 違いを教えて")]);
        assert_eq!(requests[1].system.as_deref(), Some(REPORT_SYSTEM_PROMPT));
        assert_eq!(
            requests[1].messages,
            vec![Message::user(
                "ユーザの質問: LangChain LangGraph 違い\n\n web検索結果: one\ntwo"
            )]
        );
    }

    #[tokio::test]
    async fn test_empty_model_text_is_an_error() {
        let model = MockModel::new("m1").with_text_response("");
        let workflow = ResearchWorkflow::new(model, StaticSearchBackend::new(["x"]), config());
        let err = workflow.generate_web_search_query("q").await.unwrap_err();
        assert!(err.is_provider());
    }

    struct FailingSearch;

    #[async_trait]
    impl SearchBackend for FailingSearch {
        async fn search(&self, _request: &SearchRequest) -> Result<Vec<String>, ToolError> {
            Err(ProviderError::http("tavily", 401, "bad key").into())
        }
    }

    #[tokio::test]
    async fn test_search_failure_stops_workflow() {
        let model = Arc::new(MockModel::new("m1").with_text_response("query"));
        let workflow = ResearchWorkflow::from_arcs(model.clone(), Arc::new(FailingSearch), config());

        let err = workflow.execute("q").await.unwrap_err();
        assert!(err.is_provider());
        assert_eq!(model.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_steps_nest_under_workflow_observation() {
        let collector = Arc::new(MemoryCollector::new());
        let tracer = Tracer::new(collector.clone(), TracingSettings::default());
        let model = MockModel::new("m1")
            .with_text_response("query")
            .with_text_response("report");
        let workflow = ResearchWorkflow::new(model, StaticSearchBackend::new(["s"]), config())
            .with_tracer(tracer.clone())
            .with_max_results(1);

        workflow.execute("question").await.unwrap();
        assert!(tracer.flush(Duration::from_secs(1)).await);

        let names: Vec<String> = collector.records().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "generate_web_search_query",
                "search_web_content",
                "generate_markdown_report",
                "execute_research_workflow",
            ]
        );

        let root = collector.find("execute_research_workflow").unwrap();
        assert!(root.is_root());
        assert_eq!(root.input, json!("question"));
        assert_eq!(root.output, Some(json!("report")));

        let search = collector.find("search_web_content").unwrap();
        assert_eq!(search.parent_id.as_deref(), Some(root.id.as_str()));
        assert_eq!(search.trace_id, root.trace_id);
        assert_eq!(search.input, json!({"search_query": "query", "max_results": 1}));
        assert_eq!(search.output, Some(json!(["s"])));
    }
}
