//! # promptrail-models
//!
//! Chat model abstraction and the Bedrock Converse client.
//!
//! A [`ChatModel`] turns a [`ModelRequest`] (model config, conversation,
//! tool definitions) into one [`ModelResponse`]. Each call is a single
//! network round trip with no retries.
//!
//! ## Providers
//!
//! - [`BedrockConverseModel`]: AWS Bedrock Converse API with SigV4 signing
//! - [`MockModel`] / [`FunctionModel`]: offline models for tests
//!
//! [`TracedModel`] wraps any model to record invocations with a
//! [`Tracer`](promptrail_tracing::Tracer).

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bedrock;
pub mod error;
pub mod mock;
pub mod model;
pub mod traced;

pub use bedrock::{AwsCredentials, BedrockConverseModel};
pub use error::ModelError;
pub use mock::{FunctionModel, MockModel};
pub use model::{BoxedModel, ChatModel, FinishReason, ModelRequest, ModelResponse};
pub use traced::TracedModel;
