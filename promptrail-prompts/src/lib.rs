//! # promptrail-prompts
//!
//! Versioned prompt templates: a registry client and a `{{variable}}`
//! renderer.
//!
//! ## Example
//!
//! ```rust
//! use promptrail_core::{Message, ModelConfig};
//! use promptrail_prompts::{bindings, render, ChatMessageTemplate, InMemoryPromptStore, NewPrompt, PromptStore};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryPromptStore::new();
//! let config = ModelConfig::new("m1", 0.5).unwrap();
//! store
//!     .register(NewPrompt::chat("greet", vec![ChatMessageTemplate::user("{{name}}, hello")], config))
//!     .await
//!     .unwrap();
//!
//! let template = store.fetch_latest("greet").await.unwrap();
//! let messages = render(&template, &bindings([("name", "Tokyo")])).unwrap();
//! assert_eq!(messages, vec![Message::user("Tokyo, hello")]);
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod langfuse;
pub mod memory;
pub mod render;
pub mod store;
pub mod template;

pub use error::PromptError;
pub use langfuse::LangfusePromptStore;
pub use memory::InMemoryPromptStore;
pub use render::{bindings, compile_text, render, variables, VariableBinding};
pub use store::PromptStore;
pub use template::{
    ChatMessageTemplate, NewPrompt, PromptBody, PromptKind, PromptTemplate, LATEST_LABEL,
};
