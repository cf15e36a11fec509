//! # promptrail-core
//!
//! Core types, messages, and error handling for the promptrail workspace.
//!
//! This crate provides the foundational types shared by every other crate:
//!
//! - **Messages**: role-tagged conversation turns and tool calls
//! - **Errors**: the error taxonomy surfaced to callers
//! - **Settings**: validated model and tracing configuration
//! - **Usage**: token accounting
//! - **Identifiers**: run, tool call, trace and observation ids
//!
//! ## Example
//!
//! ```rust
//! use promptrail_core::{Message, ModelConfig, Role};
//!
//! let config = ModelConfig::new("us.anthropic.claude-3-7-sonnet-20250219-v1:0", 0.5)
//!     .expect("valid config");
//! let conversation = vec![
//!     Message::system("You are a helpful assistant."),
//!     Message::user("Hello!"),
//! ];
//!
//! assert_eq!(conversation[1].role, Role::User);
//! assert_eq!(config.temperature, 0.5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod errors;
pub mod identifier;
pub mod messages;
pub mod settings;
pub mod usage;

pub use errors::{
    NotFoundError, PromptrailError, ProviderError, Result, TracingDeliveryError, ValidationError,
};
pub use identifier::{generate_observation_id, generate_run_id, generate_tool_call_id, now_utc};
pub use messages::{Message, Role, ToolCall};
pub use settings::{LangfuseConfig, ModelConfig, TracingSettings};
pub use usage::Usage;

/// Prelude module for common imports.
///
/// ```rust
/// use promptrail_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::errors::{
        NotFoundError, PromptrailError, ProviderError, Result, TracingDeliveryError,
        ValidationError,
    };
    pub use crate::identifier::{generate_run_id, generate_tool_call_id, now_utc};
    pub use crate::messages::{Message, Role, ToolCall};
    pub use crate::settings::{LangfuseConfig, ModelConfig, TracingSettings};
    pub use crate::usage::Usage;
}
