//! Agent builder pattern.

use promptrail_core::ModelConfig;
use promptrail_models::{BoxedModel, ChatModel};
use promptrail_tools::{BoxedTool, Tool, ToolSet};
use promptrail_tracing::Tracer;
use std::sync::Arc;

use crate::agent::Agent;
use crate::errors::AgentRunError;

/// Builder for [`Agent`].
pub struct AgentBuilder {
    model: BoxedModel,
    config: Option<ModelConfig>,
    system_prompt: Option<String>,
    tools: ToolSet,
    max_iterations: usize,
    tracer: Tracer,
}

impl AgentBuilder {
    /// Create a builder around `model`.
    pub fn new<M: ChatModel + 'static>(model: M) -> Self {
        Self::from_arc(Arc::new(model))
    }

    /// Create a builder around a shared model.
    pub fn from_arc(model: BoxedModel) -> Self {
        Self {
            model,
            config: None,
            system_prompt: None,
            tools: ToolSet::new(),
            max_iterations: Agent::DEFAULT_MAX_ITERATIONS,
            tracer: Tracer::disabled(),
        }
    }

    /// Set the model configuration (required).
    #[must_use]
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Add a tool.
    #[must_use]
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.insert(tool);
        self
    }

    /// Add a shared tool.
    #[must_use]
    pub fn tool_arc(mut self, tool: BoxedTool) -> Self {
        self.tools.insert_arc(tool);
        self
    }

    /// Replace the tool set.
    #[must_use]
    pub fn tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    /// Cap the number of model calls per run.
    #[must_use]
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Observe runs, decisions and tool calls.
    #[must_use]
    pub fn tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Build the agent.
    pub fn build(self) -> Result<Agent, AgentRunError> {
        let config = self
            .config
            .ok_or_else(|| AgentRunError::config("agent needs a model config"))?;
        if self.max_iterations == 0 {
            return Err(AgentRunError::config("max_iterations must be at least 1"));
        }

        let tool_definitions = self.tools.definitions();
        Ok(Agent {
            model: self.model,
            config,
            system_prompt: self.system_prompt,
            tools: self.tools,
            tool_definitions,
            max_iterations: self.max_iterations,
            tracer: self.tracer,
        })
    }
}

/// Start building an agent around `model`.
///
/// ```rust
/// use promptrail_agent::agent;
/// use promptrail_core::ModelConfig;
/// use promptrail_models::MockModel;
///
/// let agent = agent(MockModel::new("m"))
///     .config(ModelConfig::new("m", 0.0).unwrap())
///     .max_iterations(5)
///     .build()
///     .unwrap();
/// assert_eq!(agent.max_iterations(), 5);
/// ```
pub fn agent<M: ChatModel + 'static>(model: M) -> AgentBuilder {
    AgentBuilder::new(model)
}
