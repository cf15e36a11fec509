//! The configured agent.

use promptrail_core::{Message, ModelConfig};
use promptrail_models::BoxedModel;
use promptrail_tools::{ToolDefinition, ToolSet};
use promptrail_tracing::Tracer;

use crate::errors::AgentRunError;
use crate::result::AgentRunResult;
use crate::run::AgentRun;

/// Observation name of a whole run.
pub const RUN_OBSERVATION: &str = "agent.run";

/// A model, its configuration and the tools it may call.
///
/// Build one with [`agent`](crate::agent) or [`AgentBuilder`](crate::AgentBuilder).
pub struct Agent {
    pub(crate) model: BoxedModel,
    pub(crate) config: ModelConfig,
    pub(crate) system_prompt: Option<String>,
    pub(crate) tools: ToolSet,
    pub(crate) tool_definitions: Vec<ToolDefinition>,
    pub(crate) max_iterations: usize,
    pub(crate) tracer: Tracer,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("model", &self.model.identifier())
            .field("config", &self.config)
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Default cap on model calls per run.
    pub const DEFAULT_MAX_ITERATIONS: usize = 25;

    /// Model configuration used for every call.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// System prompt sent with every call.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Configured tools.
    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Cap on model calls per run.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run until the model answers without tool calls.
    pub async fn run(&self, initial_messages: Vec<Message>) -> Result<AgentRunResult, AgentRunError> {
        self.tracer
            .observe(
                RUN_OBSERVATION,
                &initial_messages,
                AgentRun::new(self, initial_messages.clone()).run_to_completion(),
            )
            .await
    }

    /// Start a run that can be driven step by step.
    pub fn start_run(&self, initial_messages: Vec<Message>) -> AgentRun<'_> {
        AgentRun::new(self, initial_messages)
    }
}
