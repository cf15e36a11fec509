//! # promptrail-tools
//!
//! Tools an agent can call, and the web search tool built on Tavily.
//!
//! ## Core Concepts
//!
//! - **[`Tool`]**: name, schema and an async `call(args)`
//! - **[`ToolSet`]**: tools matched by exact name, in registration order
//! - **[`SearchBackend`]**: a web search provider, such as [`TavilyClient`]
//! - **[`WebSearchTool`]**: a [`SearchBackend`] exposed as `tavily_search`
//!
//! ## Example
//!
//! ```rust
//! use promptrail_tools::{StaticSearchBackend, ToolSet, WebSearchTool};
//!
//! let tools = ToolSet::new().with(WebSearchTool::new(StaticSearchBackend::new(["snippet"])));
//! assert!(tools.contains("tavily_search"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;
pub mod definition;
pub mod errors;
pub mod return_types;
pub mod tool;
pub mod toolset;

pub use common::{
    SearchBackend, SearchRequest, StaticSearchBackend, TavilyClient, TavilySearchDepth, Topic,
    WebSearchTool,
};
pub use definition::{ObjectJsonSchema, ToolDefinition};
pub use errors::ToolError;
pub use return_types::{ToolResult, ToolReturn};
pub use tool::{BoxedTool, FunctionTool, Tool};
pub use toolset::ToolSet;
