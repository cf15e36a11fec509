//! # promptrail
//!
//! Templated prompts, hosted chat models, a web-search agent and
//! observation tracing, wired together.
//!
//! ## Quick Start
//!
//! ```rust
//! use promptrail::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new("m1").with_text_response("Tokyo has about 14 million people.");
//! let agent = agent(model)
//!     .config(ModelConfig::new("m1", 0.5).unwrap())
//!     .tool(WebSearchTool::new(StaticSearchBackend::new(["snippet"])))
//!     .build()
//!     .unwrap();
//!
//! let result = agent.run(vec![Message::user("How many people live in Tokyo?")]).await.unwrap();
//! assert_eq!(result.output(), "Tokyo has about 14 million people.");
//! # });
//! ```
//!
//! ## Architecture
//!
//! - [`promptrail_core`] - messages, model configuration, errors
//! - [`promptrail_prompts`] - prompt store clients and the template renderer
//! - [`promptrail_models`] - the chat model trait and the Bedrock client
//! - [`promptrail_tools`] - tools and the Tavily web search tool
//! - [`promptrail_tracing`] - the `observe` wrapper and trace collectors
//! - [`promptrail_agent`] - the tool-calling agent loop
//!
//! This crate adds [`Settings`] (environment configuration), [`direct`]
//! model calls, the [`ResearchWorkflow`] and the [`PromptAgentPipeline`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod direct;
pub mod pipeline;
pub mod research;

pub use promptrail_agent as agent_runner;
pub use promptrail_core as core;
pub use promptrail_models as models;
pub use promptrail_prompts as prompts;
pub use promptrail_tools as tools;
pub use promptrail_tracing as trace;

pub use config::{DotenvStatus, Settings};
pub use direct::{chat, model_request};
pub use pipeline::{convert_prompt, create_prompt, PromptAgentPipeline};
pub use research::ResearchWorkflow;

pub use promptrail_agent::{agent, Agent, AgentBuilder, AgentRunError, AgentRunResult};
pub use promptrail_core::{
    LangfuseConfig, Message, ModelConfig, PromptrailError, Result, Role, ToolCall,
    TracingSettings, Usage,
};
pub use promptrail_models::{BedrockConverseModel, ChatModel, ModelRequest, ModelResponse, TracedModel};
pub use promptrail_prompts::{bindings, render, PromptStore, PromptTemplate, VariableBinding};
pub use promptrail_tools::{SearchBackend, TavilyClient, WebSearchTool};
pub use promptrail_tracing::{init_logging, LogConfig, Tracer};

/// Model used by the demo binaries.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-3-7-sonnet-20250219-v1:0";

/// Common imports.
///
/// ```rust
/// use promptrail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::pipeline::{convert_prompt, create_prompt, PromptAgentPipeline};
    pub use crate::research::ResearchWorkflow;
    pub use crate::DEFAULT_MODEL_ID;

    pub use promptrail_agent::{agent, Agent, AgentBuilder, AgentRunError, AgentRunResult};
    pub use promptrail_core::prelude::*;
    pub use promptrail_models::{
        BedrockConverseModel, ChatModel, MockModel, ModelRequest, ModelResponse, TracedModel,
    };
    pub use promptrail_prompts::{
        bindings, render, ChatMessageTemplate, InMemoryPromptStore, LangfusePromptStore,
        NewPrompt, PromptKind, PromptStore, PromptTemplate, VariableBinding, LATEST_LABEL,
    };
    pub use promptrail_tools::{
        SearchBackend, StaticSearchBackend, TavilyClient, Tool, ToolSet, Topic, WebSearchTool,
    };
    pub use promptrail_tracing::{init_logging, LogConfig, MemoryCollector, Tracer};
}
