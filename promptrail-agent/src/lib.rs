//! # promptrail-agent
//!
//! A tool-augmented agent: the model is asked what to do, requested tools
//! are executed, and their results are fed back until the model answers
//! without tool calls.
//!
//! ```rust
//! use promptrail_agent::agent;
//! use promptrail_core::{Message, ModelConfig};
//! use promptrail_models::MockModel;
//! use promptrail_tools::{StaticSearchBackend, WebSearchTool};
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new("m")
//!     .with_tool_call_response("tavily_search", serde_json::json!({"query": "rust"}))
//!     .with_text_response("Rust is a systems language.");
//!
//! let agent = agent(model)
//!     .config(ModelConfig::new("m", 0.0).unwrap())
//!     .tool(WebSearchTool::new(StaticSearchBackend::new(["Rust 1.0 shipped in 2015"])))
//!     .build()
//!     .unwrap();
//!
//! let result = agent.run(vec![Message::user("What is Rust?")]).await.unwrap();
//! assert_eq!(result.transcript.len(), 4);
//! assert_eq!(result.output(), "Rust is a systems language.");
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod agent;
pub mod builder;
pub mod errors;
pub mod result;
pub mod run;

pub use agent::Agent;
pub use builder::{agent, AgentBuilder};
pub use errors::AgentRunError;
pub use result::AgentRunResult;
pub use run::{AgentRun, RunState, StepResult};
