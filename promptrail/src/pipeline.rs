//! Stored prompt → rendered messages → tool-calling agent.

use promptrail_agent::{Agent, AgentBuilder, AgentRunResult};
use promptrail_core::{Message, ModelConfig, PromptrailError};
use promptrail_models::{BoxedModel, ChatModel};
use promptrail_prompts::{
    render, ChatMessageTemplate, NewPrompt, PromptKind, PromptStore, PromptTemplate,
    VariableBinding, LATEST_LABEL,
};
use promptrail_tools::{SearchBackend, Topic, WebSearchTool};
use promptrail_tracing::Tracer;
use std::sync::Arc;
use tracing::{debug, info};

/// Register a chat prompt made of one user message.
pub async fn create_prompt<S>(
    store: &S,
    name: &str,
    user_template: &str,
    config: ModelConfig,
) -> Result<PromptTemplate, PromptrailError>
where
    S: PromptStore + ?Sized,
{
    let prompt = NewPrompt::chat(name, vec![ChatMessageTemplate::user(user_template)], config);
    let template = store.register(prompt).await?;
    info!(name = %template.name, version = template.version, "Registered prompt");
    Ok(template)
}

/// Fetch the `latest` chat prompt and fill in its variables.
pub async fn convert_prompt<S>(
    store: &S,
    name: &str,
    vars: &VariableBinding,
) -> Result<Vec<Message>, PromptrailError>
where
    S: PromptStore + ?Sized,
{
    let template = store.fetch(name, PromptKind::Chat, LATEST_LABEL).await?;
    Ok(render(&template, vars)?)
}

/// Runs an agent configured by a stored prompt.
///
/// The prompt supplies both the opening messages and the model
/// configuration. The agent gets one tool, web search.
#[derive(Clone)]
pub struct PromptAgentPipeline {
    store: Arc<dyn PromptStore>,
    model: BoxedModel,
    search: Arc<dyn SearchBackend>,
    tracer: Tracer,
    label: String,
    max_results: usize,
}

impl std::fmt::Debug for PromptAgentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptAgentPipeline")
            .field("model", &self.model.identifier())
            .field("label", &self.label)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl PromptAgentPipeline {
    /// Search results per tool call.
    pub const DEFAULT_MAX_RESULTS: usize = 2;

    /// Create a pipeline reading the `latest` label.
    pub fn new<P, M, S>(store: P, model: M, search: S) -> Self
    where
        P: PromptStore + 'static,
        M: ChatModel + 'static,
        S: SearchBackend + 'static,
    {
        Self::from_arcs(Arc::new(store), Arc::new(model), Arc::new(search))
    }

    /// Create a pipeline from shared clients.
    pub fn from_arcs(
        store: Arc<dyn PromptStore>,
        model: BoxedModel,
        search: Arc<dyn SearchBackend>,
    ) -> Self {
        Self {
            store,
            model,
            search,
            tracer: Tracer::disabled(),
            label: LATEST_LABEL.to_string(),
            max_results: Self::DEFAULT_MAX_RESULTS,
        }
    }

    /// Observe agent runs with `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Read a different label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the number of search results per tool call.
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Fetch the chat prompt under the configured label.
    pub async fn fetch_template(&self, name: &str) -> Result<PromptTemplate, PromptrailError> {
        Ok(self.store.fetch(name, PromptKind::Chat, &self.label).await?)
    }

    /// Build an agent from a template's model configuration.
    pub fn build_agent(&self, template: &PromptTemplate) -> Result<Agent, PromptrailError> {
        let config = template.model_config()?;
        debug!(
            prompt = %template.name,
            version = template.version,
            model_id = %config.model_id,
            temperature = config.temperature,
            "Building agent from prompt"
        );
        let search = WebSearchTool::from_arc(self.search.clone())
            .with_max_results(self.max_results)
            .with_topic(Topic::General);
        Ok(AgentBuilder::from_arc(self.model.clone())
            .config(config)
            .tool(search)
            .tracer(self.tracer.clone())
            .build()?)
    }

    /// Fetch, render, build and run.
    pub async fn run(
        &self,
        name: &str,
        vars: &VariableBinding,
    ) -> Result<AgentRunResult, PromptrailError> {
        let template = self.fetch_template(name).await?;
        let messages = render(&template, vars)?;
        let agent = self.build_agent(&template)?;
        Ok(agent.run(messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptrail_models::MockModel;
    use promptrail_prompts::{bindings, InMemoryPromptStore};
    use promptrail_tools::StaticSearchBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> ModelConfig {
        ModelConfig::new("m1", 0.5).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_convert() {
        let store = InMemoryPromptStore::new();
        let created = create_prompt(&store, "greet", "{{name}}, hello", config())
            .await
            .unwrap();
        assert_eq!(created.version, 1);
        assert_eq!(created.model_config().unwrap(), config());

        let messages = convert_prompt(&store, "greet", &bindings([("name", "Tokyo")]))
            .await
            .unwrap();
        assert_eq!(messages, vec![Message::user("Tokyo, hello")]);
    }

    #[tokio::test]
    async fn test_convert_errors() {
        let store = InMemoryPromptStore::new();
        let err = convert_prompt(&store, "absent", &VariableBinding::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        create_prompt(&store, "greet", "{{name}}, hello", config())
            .await
            .unwrap();
        let err = convert_prompt(&store, "greet", &VariableBinding::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_pipeline_runs_agent_with_prompt_config() {
        let store = Arc::new(InMemoryPromptStore::new());
        create_prompt(store.as_ref(), "ai-agent", "{{city}}の人口は？", config())
            .await
            .unwrap();

        let model = Arc::new(
            MockModel::new("m1")
                .with_tool_call_response("tavily_search", json!({"query": "横浜 人口"}))
                .with_text_response("横浜の人口は約377万人です。"),
        );
        let search = Arc::new(StaticSearchBackend::new(["a", "b", "c"]));
        let pipeline = PromptAgentPipeline::from_arcs(store, model.clone(), search.clone());

        let result = pipeline
            .run("ai-agent", &bindings([("city", "横浜")]))
            .await
            .unwrap();

        assert_eq!(result.transcript.len(), 4);
        assert_eq!(result.transcript[0], Message::user("横浜の人口は？"));
        assert_eq!(result.output(), "横浜の人口は約377万人です。");

        let searches = search.requests();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].query, "横浜 人口");
        assert_eq!(searches[0].max_results, 2);
        assert_eq!(searches[0].topic, Topic::General);

        let requests = model.recorded_requests();
        assert_eq!(requests[0].config, config());
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[0].tools[0].name, "tavily_search");
    }

    #[tokio::test]
    async fn test_pipeline_missing_label() {
        let store = InMemoryPromptStore::new();
        create_prompt(&store, "ai-agent", "{{city}}", config())
            .await
            .unwrap();
        let pipeline = PromptAgentPipeline::new(
            store,
            MockModel::new("m1"),
            StaticSearchBackend::new(["a"]),
        )
        .with_label("production");

        let err = pipeline
            .run("ai-agent", &bindings([("city", "x")]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
